use serde::{Deserialize, Serialize};

use super::form::{Checks, Validate, ValidationError};
use super::reservation::Reservation;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    pub customer_events: Vec<CustomerEvent>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: i32,
    pub observations: String,
    pub date_created: String,
    pub reservation: Option<Reservation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
}

/// Body of `POST customer` / `PUT customer`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
}

impl Validate for CustomerForm {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new()
            .required("firstName", &self.first_name, "Customer first name is required.")
            .required("lastName", &self.last_name, "Customer last name is required.")
            .required("address", &self.address, "Customer address is required.")
            .required("phoneNumber", &self.phone_number, "Customer phone number is required.")
            .required("email", &self.email, "Customer email is required.")
            .finish()
    }
}

impl From<&Customer> for CustomerForm {
    fn from(customer: &Customer) -> Self {
        Self {
            id: Some(customer.id.clone()),
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            address: customer.address.clone(),
            phone_number: customer.phone_number.clone(),
            email: customer.email.clone(),
        }
    }
}

use serde::{Deserialize, Serialize};

use super::form::{Checks, Validate, ValidationError};
use super::room::RoomEvent;

/// Staff role, carried as an integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum JobType {
    #[default]
    Concierge,
    Receptionist,
    Cleaning,
    Cooking,
    /// A code this client does not know yet
    Unknown(u8),
}

impl JobType {
    pub fn is_known(&self) -> bool {
        !matches!(self, JobType::Unknown(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobType::Concierge => "Concierge",
            JobType::Receptionist => "Receptionist",
            JobType::Cleaning => "Cleaning",
            JobType::Cooking => "Cooking",
            JobType::Unknown(_) => "Unknown",
        }
    }
}

impl From<JobType> for u8 {
    fn from(job: JobType) -> Self {
        match job {
            JobType::Concierge => 0,
            JobType::Receptionist => 1,
            JobType::Cleaning => 2,
            JobType::Cooking => 3,
            JobType::Unknown(code) => code,
        }
    }
}

impl From<u8> for JobType {
    fn from(value: u8) -> Self {
        match value {
            0 => JobType::Concierge,
            1 => JobType::Receptionist,
            2 => JobType::Cleaning,
            3 => JobType::Cooking,
            other => JobType::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub job_type: JobType,
    pub room_events: Vec<RoomEvent>,
    pub employee_shifts: Vec<EmployeeShift>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeShift {
    pub id: String,
    pub start_date: String,
    pub end_date: String,
    pub observations: String,
}

/// Row of `GET employee/available`: someone currently on shift.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvailableEmployee {
    pub employee_name: String,
    pub start_date: String,
    pub end_date: String,
    pub job_type: JobType,
    pub observations: String,
}

/// Body of `POST employee` / `PUT employee`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
}

impl Validate for EmployeeForm {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new()
            .required("firstName", &self.first_name, "Employee first name is required.")
            .required("lastName", &self.last_name, "Employee last name is required.")
            .check(
                self.job_type.is_some_and(|j| j.is_known()),
                "jobType",
                "Employee job type is required.",
            )
            .finish()
    }
}

impl From<&Employee> for EmployeeForm {
    fn from(employee: &Employee) -> Self {
        Self {
            id: Some(employee.id.clone()),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            job_type: Some(employee.job_type),
        }
    }
}

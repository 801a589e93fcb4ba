use serde::{Deserialize, Serialize};

use super::form::{Checks, Validate, ValidationError};
use crate::utils::parse_date;

/// Lifecycle of a booking, carried as an integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ReservationStatus {
    #[default]
    Upcoming,
    Active,
    Ended,
    Cancelled,
    /// A code this client does not know yet
    Unknown(u8),
}

impl ReservationStatus {
    pub fn is_known(&self) -> bool {
        !matches!(self, ReservationStatus::Unknown(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Upcoming => "Upcoming",
            ReservationStatus::Active => "Active",
            ReservationStatus::Ended => "Ended",
            ReservationStatus::Cancelled => "Cancelled",
            ReservationStatus::Unknown(_) => "Unknown",
        }
    }
}

impl From<ReservationStatus> for u8 {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Upcoming => 0,
            ReservationStatus::Active => 1,
            ReservationStatus::Ended => 2,
            ReservationStatus::Cancelled => 3,
            ReservationStatus::Unknown(code) => code,
        }
    }
}

impl From<u8> for ReservationStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => ReservationStatus::Upcoming,
            1 => ReservationStatus::Active,
            2 => ReservationStatus::Ended,
            3 => ReservationStatus::Cancelled,
            other => ReservationStatus::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reservation {
    pub id: String,
    pub check_in: String,
    pub check_out: String,
    pub guest_count: i32,
    pub status: ReservationStatus,
    pub room_name: String,
    pub room_id: String,
    pub customer_name: String,
    pub observations: String,
}

/// Row of `GET reservation/active` on the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveReservation {
    pub room_name: String,
    pub customer_name: String,
    pub check_in: String,
    pub check_out: String,
    pub status: ReservationStatus,
}

/// Body of `POST reservation` / `PUT reservation`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub check_in: String,
    #[serde(default)]
    pub check_out: String,
    #[serde(default)]
    pub room_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub observations: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
}

impl Validate for ReservationForm {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        checks
            .required("checkIn", &self.check_in, "Reservation check-in date is required.")
            .required("checkOut", &self.check_out, "Reservation check-out date is required.")
            .required("roomId", &self.room_id, "Reservation room is required.")
            .check(
                self.status.is_some_and(|s| s.is_known()),
                "status",
                "Reservation status is required.",
            )
            .check(
                self.guest_count.is_some(),
                "guestCount",
                "Reservation guest count is required.",
            );

        // The customer is fixed once a reservation exists
        if self.id.is_none() {
            checks.required(
                "customerId",
                self.customer_id.as_deref().unwrap_or_default(),
                "Reservation customer is required.",
            );
        }

        if !self.check_in.trim().is_empty() && !self.check_out.trim().is_empty() {
            match (parse_date(&self.check_in), parse_date(&self.check_out)) {
                (Some(check_in), Some(check_out)) => {
                    checks.check(
                        check_out >= check_in,
                        "checkOut",
                        "Reservation check-out must not be before check-in.",
                    );
                }
                (None, _) => checks.fail("checkIn", "Reservation check-in date is invalid."),
                (_, None) => checks.fail("checkOut", "Reservation check-out date is invalid."),
            }
        }

        checks.finish()
    }
}

impl From<&Reservation> for ReservationForm {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id: Some(reservation.id.clone()),
            check_in: reservation.check_in.clone(),
            check_out: reservation.check_out.clone(),
            room_id: reservation.room_id.clone(),
            customer_id: None,
            observations: reservation.observations.clone(),
            guest_count: Some(reservation.guest_count),
            status: Some(reservation.status),
        }
    }
}

use serde::{Deserialize, Serialize};

use super::form::{Checks, Validate, ValidationError};
use super::reservation::Reservation;

/// Occupancy state of a room, carried as an integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum RoomStatus {
    #[default]
    InUse,
    Maintenance,
    /// A code this client does not know yet
    Unknown(u8),
}

impl RoomStatus {
    pub fn is_known(&self) -> bool {
        !matches!(self, RoomStatus::Unknown(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::InUse => "In Use",
            RoomStatus::Maintenance => "Maintenance",
            RoomStatus::Unknown(_) => "Unknown",
        }
    }
}

impl From<RoomStatus> for u8 {
    fn from(status: RoomStatus) -> Self {
        match status {
            RoomStatus::InUse => 0,
            RoomStatus::Maintenance => 1,
            RoomStatus::Unknown(code) => code,
        }
    }
}

impl From<u8> for RoomStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => RoomStatus::InUse,
            1 => RoomStatus::Maintenance,
            other => RoomStatus::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub number: i32,
    pub guest_count: i32,
    pub status: RoomStatus,
    pub room_events: Vec<RoomEvent>,
}

impl Room {
    /// "101 - Garden Suite"
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.number, self.name)
    }
}

/// Something that happened to a room (cleaning, repair, check-in, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: i32,
    pub observations: String,
    pub date_created: String,
    pub employee_name: String,
    pub reservation: Option<Reservation>,
}

/// Lightweight room reference used to populate reservation pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSummary {
    pub id: String,
    pub name: String,
}

/// Body of `POST room` / `PUT room`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
}

impl Validate for RoomForm {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new()
            .required("name", &self.name, "Room name is required.")
            .check(self.number.is_some(), "number", "Room number is required.")
            .check(self.guest_count.is_some(), "guestCount", "Room guest number is required.")
            .check(
                self.status.is_some_and(|s| s.is_known()),
                "status",
                "Room status is required.",
            )
            .finish()
    }
}

impl From<&Room> for RoomForm {
    fn from(room: &Room) -> Self {
        Self {
            id: Some(room.id.clone()),
            name: room.name.clone(),
            number: Some(room.number),
            guest_count: Some(room.guest_count),
            status: Some(room.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_room_with_events() {
        let json = r#"{
            "id": "7f1c",
            "name": "Garden Suite",
            "number": 101,
            "guestCount": 3,
            "status": 1,
            "roomEvents": [{
                "id": "e1",
                "type": 2,
                "observations": "Leaking tap",
                "dateCreated": "2022-03-01T10:00:00Z",
                "employeeName": "Ana Pop",
                "reservation": {"roomName": "Garden Suite", "customerName": "Ion Ionescu", "status": 1}
            }]
        }"#;

        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.number, 101);
        assert_eq!(room.status, RoomStatus::Maintenance);
        assert_eq!(room.status.label(), "Maintenance");
        assert_eq!(room.display_name(), "101 - Garden Suite");
        assert_eq!(room.room_events[0].event_type, 2);
        let reservation = room.room_events[0].reservation.as_ref().unwrap();
        assert_eq!(reservation.customer_name, "Ion Ionescu");
    }

    #[test]
    fn test_unknown_status_kept_but_not_submittable() {
        let room: Room = serde_json::from_str(r#"{"status": 9}"#).unwrap();
        assert_eq!(room.status, RoomStatus::Unknown(9));
        assert_eq!(room.status.label(), "Unknown");
        assert_eq!(serde_json::to_value(room.status).unwrap(), 9);

        let err = RoomForm::from(&room).validate().unwrap_err();
        assert!(err.fields().contains(&"status"));
    }

    #[test]
    fn test_room_form_validation() {
        let err = RoomForm::default().validate().unwrap_err();
        assert_eq!(err.fields(), vec!["name", "number", "guestCount", "status"]);
        assert!(err.to_string().starts_with("Room name is required."));

        let form = RoomForm {
            name: "Garden Suite".to_string(),
            number: Some(101),
            guest_count: Some(2),
            status: Some(RoomStatus::InUse),
            ..RoomForm::default()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_room_form_serializes_camel_case_without_missing_id() {
        let form = RoomForm {
            name: "Garden Suite".to_string(),
            number: Some(101),
            guest_count: Some(2),
            status: Some(RoomStatus::Maintenance),
            ..RoomForm::default()
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "Garden Suite", "number": 101, "guestCount": 2, "status": 1})
        );
    }

    #[test]
    fn test_room_form_from_room_keeps_id() {
        let room = Room {
            id: "7f1c".to_string(),
            name: "Attic".to_string(),
            number: 7,
            guest_count: 1,
            ..Room::default()
        };
        let form = RoomForm::from(&room);
        assert_eq!(form.id.as_deref(), Some("7f1c"));
        assert!(form.validate().is_ok());
    }
}

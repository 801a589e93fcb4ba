//! Room occupancy and rating rankings from `GET room/analytics`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomOccupancy {
    pub name: String,
    pub occupancy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomRating {
    pub name: String,
    pub rating: f64,
}

/// The four rankings the server computes; each list arrives already ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomAnalytics {
    pub least_occupied_rooms: Vec<RoomOccupancy>,
    pub most_occupied_rooms: Vec<RoomOccupancy>,
    pub worst_rated_rooms: Vec<RoomRating>,
    pub best_rated_rooms: Vec<RoomRating>,
}

impl RoomAnalytics {
    pub fn is_empty(&self) -> bool {
        self.least_occupied_rooms.is_empty()
            && self.most_occupied_rooms.is_empty()
            && self.worst_rated_rooms.is_empty()
            && self.best_rated_rooms.is_empty()
    }
}

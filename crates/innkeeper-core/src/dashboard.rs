//! Landing-page data: room rankings, who is staying, who is on shift.

use anyhow::Result;
use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::models::{ActiveReservation, AvailableEmployee, RoomAnalytics};

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub analytics: RoomAnalytics,
    pub active_reservations: Vec<ActiveReservation>,
    pub available_employees: Vec<AvailableEmployee>,
    /// Sections that could not be loaded and are shown empty
    pub failed_sections: Vec<&'static str>,
}

impl Dashboard {
    /// Fetch all three sections concurrently.
    ///
    /// Sections fail independently and come back empty, except that a
    /// rejected credential fails the whole load so the caller can end the
    /// session.
    pub async fn load(api: &ApiClient) -> Result<Self> {
        let (analytics, active_reservations, available_employees) = futures::join!(
            api.fetch_room_analytics(),
            api.fetch_active_reservations(),
            api.fetch_available_employees(),
        );

        for result in [
            analytics.as_ref().err(),
            active_reservations.as_ref().err(),
            available_employees.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        {
            if is_auth_failure(result) {
                return Err(ApiError::Unauthorized.into());
            }
        }

        let mut failed_sections = Vec::new();
        Ok(Dashboard {
            analytics: section(&mut failed_sections, "room analytics", analytics),
            active_reservations: section(&mut failed_sections, "active reservations", active_reservations),
            available_employees: section(&mut failed_sections, "available employees", available_employees),
            failed_sections,
        })
    }
}

fn section<T: Default>(failed: &mut Vec<&'static str>, name: &'static str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(section = name, error = %e, "Dashboard section failed to load");
            failed.push(name);
            T::default()
        }
    }
}

pub(crate) fn is_auth_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>()
        .is_some_and(ApiError::is_auth_failure)
}

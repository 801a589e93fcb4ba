//! Innkeeper core - session management, REST client and models for a hotel
//! back office.
//!
//! The [`auth::SessionManager`] owns the staff session: it persists the
//! token, restores it on start, and logs out automatically when the token
//! expires. Everything else is a thin, typed layer over the hotel API.

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod models;
pub mod routes;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{RestorePolicy, SessionManager, SessionState};
pub use config::Config;
pub use context::AppContext;
pub use dashboard::Dashboard;
pub use routes::Route;

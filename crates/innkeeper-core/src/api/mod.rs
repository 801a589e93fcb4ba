//! REST API client module for the hotel back-office service.
//!
//! This module provides the `ApiClient` for reading and editing rooms,
//! customers, employees and reservations, and for the dashboard endpoints.
//!
//! Authenticated requests carry the session token verbatim in the
//! `Authorization` header.

pub mod client;
pub mod error;
pub mod resource;

pub use client::ApiClient;
pub use error::ApiError;
pub use resource::{Customers, Employees, Reservations, Resource, Rooms};

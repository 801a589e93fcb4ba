//! Data models for hotel back-office entities.
//!
//! This module contains the data structures exchanged with the hotel API:
//!
//! - `Room`, `RoomEvent`, `RoomStatus`: rooms and their history
//! - `Customer`, `CustomerEvent`: guests
//! - `Employee`, `EmployeeShift`, `JobType`: staff
//! - `Reservation`, `ReservationStatus`: bookings
//! - `RoomAnalytics`: occupancy and rating rankings for the dashboard
//!
//! Each entity has a matching `*Form` used as the create/update body,
//! checked with [`Validate`] before it is sent.

pub mod analytics;
pub mod auth;
pub mod customer;
pub mod employee;
pub mod form;
pub mod reservation;
pub mod room;

pub use analytics::{RoomAnalytics, RoomOccupancy, RoomRating};
pub use auth::{LoginForm, LoginResponse};
pub use customer::{Customer, CustomerEvent, CustomerForm, CustomerSummary};
pub use employee::{AvailableEmployee, Employee, EmployeeForm, EmployeeShift, JobType};
pub use form::{FieldError, Validate, ValidationError};
pub use reservation::{
    ActiveReservation, Reservation, ReservationForm, ReservationStatus,
};
pub use room::{Room, RoomEvent, RoomForm, RoomStatus, RoomSummary};

//! The four CRUD collections the back office manages.
//!
//! Each collection lives at a single path and supports list (GET),
//! create (POST), update (PUT) and delete (DELETE with an `{"id"}` body).

use serde::{de::DeserializeOwned, Serialize};

use crate::models::{
    Customer, CustomerForm, Employee, EmployeeForm, Reservation, ReservationForm, Room, RoomForm,
    Validate,
};

pub trait Resource {
    /// Path relative to the API base URL
    const PATH: &'static str;
    /// Singular noun for messages
    const NAME: &'static str;

    type Item: DeserializeOwned + Send;
    type Form: Serialize + Validate + Sync;
}

pub struct Rooms;

impl Resource for Rooms {
    const PATH: &'static str = "room";
    const NAME: &'static str = "room";
    type Item = Room;
    type Form = RoomForm;
}

pub struct Customers;

impl Resource for Customers {
    const PATH: &'static str = "customer";
    const NAME: &'static str = "customer";
    type Item = Customer;
    type Form = CustomerForm;
}

pub struct Employees;

impl Resource for Employees {
    const PATH: &'static str = "employee";
    const NAME: &'static str = "employee";
    type Item = Employee;
    type Form = EmployeeForm;
}

pub struct Reservations;

impl Resource for Reservations {
    const PATH: &'static str = "reservation";
    const NAME: &'static str = "reservation";
    type Item = Reservation;
    type Form = ReservationForm;
}

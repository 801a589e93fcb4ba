//! Plain-text tables for the terminal.

use innkeeper_core::models::{Customer, CustomerSummary, Employee, Reservation, Room, RoomSummary};
use innkeeper_core::utils::{format_date, truncate_string};
use innkeeper_core::Dashboard;

const NAME_WIDTH: usize = 24;

fn room_row(room: &Room) -> String {
    format!(
        "{:<38} {:>5}  {:<w$} {:>6}  {}",
        room.id,
        room.number,
        truncate_string(&room.name, NAME_WIDTH),
        room.guest_count,
        room.status.label(),
        w = NAME_WIDTH,
    )
}

fn customer_row(customer: &Customer) -> String {
    format!(
        "{:<38} {:<w$} {:<16} {}",
        customer.id,
        truncate_string(&customer.full_name(), NAME_WIDTH),
        customer.phone_number,
        customer.email,
        w = NAME_WIDTH,
    )
}

fn employee_row(employee: &Employee) -> String {
    format!(
        "{:<38} {:<w$} {}",
        employee.id,
        truncate_string(&employee.full_name(), NAME_WIDTH),
        employee.job_type.label(),
        w = NAME_WIDTH,
    )
}

fn reservation_row(reservation: &Reservation) -> String {
    format!(
        "{:<38} {:<w$} {:<w$} {:<12} {:<12} {}",
        reservation.id,
        truncate_string(&reservation.room_name, NAME_WIDTH),
        truncate_string(&reservation.customer_name, NAME_WIDTH),
        format_date(&reservation.check_in),
        format_date(&reservation.check_out),
        reservation.status.label(),
        w = NAME_WIDTH,
    )
}

fn print_rows<T>(items: &[T], empty: &str, row: fn(&T) -> String) {
    if items.is_empty() {
        println!("{}", empty);
        return;
    }
    for item in items {
        println!("{}", row(item));
    }
}

pub fn print_rooms(rooms: &[Room]) {
    print_rows(rooms, "No rooms.", room_row);
}

pub fn print_customers(customers: &[Customer]) {
    print_rows(customers, "No customers.", customer_row);
}

pub fn print_employees(employees: &[Employee]) {
    print_rows(employees, "No employees.", employee_row);
}

pub fn print_reservations(reservations: &[Reservation]) {
    print_rows(reservations, "No reservations.", reservation_row);
}

fn summary_row(id: &str, name: &str) -> String {
    format!("{:<38} {}", id, name)
}

pub fn print_room_summaries(rooms: &[RoomSummary]) {
    print_rows(rooms, "No rooms.", |r| summary_row(&r.id, &r.name));
}

pub fn print_customer_summaries(customers: &[CustomerSummary]) {
    print_rows(customers, "No customers.", |c| summary_row(&c.id, &c.name));
}

fn dashboard_lines(dashboard: &Dashboard) -> Vec<String> {
    let mut lines = Vec::new();
    let analytics = &dashboard.analytics;

    lines.push("Most occupied rooms".to_string());
    for room in &analytics.most_occupied_rooms {
        lines.push(format!("  {:<w$} {:>6.1}", room.name, room.occupancy, w = NAME_WIDTH));
    }
    lines.push("Least occupied rooms".to_string());
    for room in &analytics.least_occupied_rooms {
        lines.push(format!("  {:<w$} {:>6.1}", room.name, room.occupancy, w = NAME_WIDTH));
    }
    lines.push("Best rated rooms".to_string());
    for room in &analytics.best_rated_rooms {
        lines.push(format!("  {:<w$} {:>6.1}", room.name, room.rating, w = NAME_WIDTH));
    }
    lines.push("Worst rated rooms".to_string());
    for room in &analytics.worst_rated_rooms {
        lines.push(format!("  {:<w$} {:>6.1}", room.name, room.rating, w = NAME_WIDTH));
    }

    lines.push(String::new());
    lines.push(format!("Active reservations ({})", dashboard.active_reservations.len()));
    for r in &dashboard.active_reservations {
        lines.push(format!(
            "  {:<w$} {:<w$} {} - {}  {}",
            truncate_string(&r.room_name, NAME_WIDTH),
            truncate_string(&r.customer_name, NAME_WIDTH),
            format_date(&r.check_in),
            format_date(&r.check_out),
            r.status.label(),
            w = NAME_WIDTH,
        ));
    }

    lines.push(String::new());
    lines.push(format!("Employees on shift ({})", dashboard.available_employees.len()));
    for e in &dashboard.available_employees {
        lines.push(format!(
            "  {:<w$} {:<12} until {}",
            truncate_string(&e.employee_name, NAME_WIDTH),
            e.job_type.label(),
            format_date(&e.end_date),
            w = NAME_WIDTH,
        ));
    }

    if !dashboard.failed_sections.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Could not load: {}",
            dashboard.failed_sections.join(", ")
        ));
    }
    lines
}

pub fn print_dashboard(dashboard: &Dashboard) {
    for line in dashboard_lines(dashboard) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use innkeeper_core::models::{ActiveReservation, ReservationStatus, RoomStatus};

    #[test]
    fn test_room_row() {
        let room = Room {
            id: "r1".to_string(),
            name: "Garden Suite".to_string(),
            number: 101,
            guest_count: 2,
            status: RoomStatus::Maintenance,
            room_events: Vec::new(),
        };
        let row = room_row(&room);
        assert!(row.starts_with("r1 "));
        assert!(row.contains("Garden Suite"));
        assert!(row.ends_with("Maintenance"));
    }

    #[test]
    fn test_reservation_row_formats_dates() {
        let reservation = Reservation {
            id: "res1".to_string(),
            check_in: "2022-06-01T14:00:00".to_string(),
            check_out: "2022-06-05".to_string(),
            status: ReservationStatus::Upcoming,
            ..Reservation::default()
        };
        let row = reservation_row(&reservation);
        assert!(row.contains("Jun 01, 2022"));
        assert!(row.contains("Jun 05, 2022"));
        assert!(row.ends_with("Upcoming"));
    }

    #[test]
    fn test_summary_row() {
        let summaries: Vec<RoomSummary> =
            serde_json::from_str(r#"[{"id":"r1","name":"101 - Garden Suite"}]"#).unwrap();
        let row = summary_row(&summaries[0].id, &summaries[0].name);
        assert!(row.starts_with("r1 "));
        assert!(row.ends_with("101 - Garden Suite"));
    }

    #[test]
    fn test_long_names_are_truncated() {
        let employee = Employee {
            first_name: "Maximilianus".to_string(),
            last_name: "Alexandrescu-Popescu".to_string(),
            ..Employee::default()
        };
        assert!(employee_row(&employee).contains("Maximilianus Alexandr..."));
    }

    #[test]
    fn test_dashboard_lists_failed_sections() {
        let dashboard = Dashboard {
            active_reservations: vec![ActiveReservation {
                room_name: "Garden Suite".to_string(),
                customer_name: "Ion Ionescu".to_string(),
                status: ReservationStatus::Active,
                ..ActiveReservation::default()
            }],
            failed_sections: vec!["room analytics"],
            ..Dashboard::default()
        };
        let lines = dashboard_lines(&dashboard);
        assert!(lines.contains(&"Active reservations (1)".to_string()));
        assert!(lines.contains(&"Employees on shift (0)".to_string()));
        assert_eq!(lines.last().unwrap(), "Could not load: room analytics");
    }
}

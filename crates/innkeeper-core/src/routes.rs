//! Which screen a request lands on, given the session state.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Rooms,
    Reservations,
    Customers,
    Employees,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Dashboard,
        Route::Rooms,
        Route::Reservations,
        Route::Customers,
        Route::Employees,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Rooms => "/dashboard/rooms",
            Route::Reservations => "/dashboard/reservations",
            Route::Customers => "/dashboard/customers",
            Route::Employees => "/dashboard/employees",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::Rooms => "Rooms",
            Route::Reservations => "Reservations",
            Route::Customers => "Customers",
            Route::Employees => "Employees",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL.into_iter().find(|r| r.path() == trimmed)
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Guard a navigation request.
///
/// Signed-out staff always land on the login screen. Signed-in staff get the
/// screen they asked for; the login screen and unknown paths send them to
/// the dashboard.
pub fn resolve(path: &str, authenticated: bool) -> Route {
    if !authenticated {
        return Route::Login;
    }
    match Route::from_path(path) {
        Some(Route::Login) | None => Route::Dashboard,
        Some(route) => route,
    }
}

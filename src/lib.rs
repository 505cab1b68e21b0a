pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use services::{AuthService, ShiftService};

pub struct AppState {
    pub auth_service: AuthService,
    pub shift_service: ShiftService,
}

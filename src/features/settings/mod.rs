//! Fax application settings page.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::{routes, SettingsState};
pub use services::SettingsService;

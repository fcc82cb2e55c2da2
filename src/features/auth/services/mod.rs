pub mod auth_service;

pub use auth_service::{AuthService, ExchangeStart, LoginSuccess};

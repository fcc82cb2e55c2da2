//! Optional login for the web pages.
//!
//! Password and delegated identity logins both end in the same signed
//! session cookie; see [`session`] for the format.

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;
pub mod session;

pub use routes::{routes, AuthState};
pub use services::AuthService;

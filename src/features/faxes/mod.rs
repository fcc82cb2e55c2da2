//! Fax pages: send form, single fax view and paged history.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::{routes, FaxState};
pub use services::{FaxDefaults, FaxService};

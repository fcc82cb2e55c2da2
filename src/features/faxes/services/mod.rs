pub mod fax_service;

pub use fax_service::{FaxDefaults, FaxService};

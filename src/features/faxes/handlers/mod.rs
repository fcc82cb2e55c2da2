pub mod fax_handler;

pub use fax_handler::{home, list_faxes, send_fax, show_fax};

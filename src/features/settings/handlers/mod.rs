pub mod settings_handler;

pub use settings_handler::{show_settings, update_settings};

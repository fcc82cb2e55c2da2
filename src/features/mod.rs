pub mod auth;
pub mod faxes;
pub mod media;
pub mod settings;

pub mod auth_handler;

pub use auth_handler::{login_page, login_submit, logout, oauth_callback, oauth_login};

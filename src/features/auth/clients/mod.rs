pub mod oauth_client;

pub use oauth_client::{OAuthClient, ProviderRegistration, ProviderTokenResponse};

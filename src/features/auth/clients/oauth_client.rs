use crate::core::config::OAuthClientConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{OAuthProvider, ProviderEndpoints};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

const TOKEN_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(15);

/// Token endpoint response, success and error shapes combined
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderTokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Seconds until expiry; absent means the provider did not say
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ProviderTokenResponse {
    /// A token is usable when it is non-empty and not already expired
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
            && !self.access_token.trim().is_empty()
            && self.expires_in.map_or(true, |secs| secs > 0)
    }
}

/// One configured identity provider
#[derive(Debug, Clone)]
pub struct ProviderRegistration {
    pub provider: OAuthProvider,
    pub client_id: String,
    pub client_secret: String,
    pub endpoints: ProviderEndpoints,
    /// `<public_base_url>/auth/callback/<provider>`
    pub redirect_uri: String,
}

impl ProviderRegistration {
    pub fn new(provider: OAuthProvider, client: &OAuthClientConfig, public_base_url: &str) -> Self {
        Self {
            provider,
            client_id: client.client_id.clone(),
            client_secret: client.client_secret.clone(),
            endpoints: provider.default_endpoints(),
            redirect_uri: format!(
                "{}/auth/callback/{}",
                public_base_url.trim_end_matches('/'),
                provider.name()
            ),
        }
    }

    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

/// Client for the authorization-code grant against identity providers
pub struct OAuthClient {
    http_client: reqwest::Client,
}

impl OAuthClient {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    /// Provider URL the browser is sent to
    pub fn authorize_url(
        &self,
        registration: &ProviderRegistration,
        state: &str,
    ) -> Result<String> {
        let scope = registration.provider.scopes().join(" ");
        let url = Url::parse_with_params(
            &registration.endpoints.auth_url,
            &[
                ("client_id", registration.client_id.as_str()),
                ("redirect_uri", registration.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| {
            AppError::Internal(format!(
                "Invalid {} authorization URL: {}",
                registration.provider, e
            ))
        })?;
        Ok(url.into())
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Returns Unauthorized if the provider refuses or hands back an
    /// unusable token.
    pub async fn exchange_code(
        &self,
        registration: &ProviderRegistration,
        code: &str,
    ) -> Result<ProviderTokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", registration.redirect_uri.as_str()),
            ("client_id", registration.client_id.as_str()),
            ("client_secret", registration.client_secret.as_str()),
        ];

        let response = self
            .http_client
            .post(&registration.endpoints.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(TOKEN_EXCHANGE_TIMEOUT)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Token exchange with {} failed: {}", registration.provider, e);
                AppError::ExternalServiceError(format!("Token exchange failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(
                "{} token endpoint returned {}: {}",
                registration.provider,
                status,
                body
            );
            return Err(AppError::Unauthorized("authentication failed".to_string()));
        }

        let token = serde_json::from_str::<ProviderTokenResponse>(&body).map_err(|e| {
            tracing::warn!(
                "Failed to parse {} token response: {}",
                registration.provider,
                e
            );
            AppError::Unauthorized("authentication failed".to_string())
        })?;

        if !token.is_valid() {
            tracing::warn!(
                provider = %registration.provider,
                error = token.error.as_deref().unwrap_or(""),
                description = token.error_description.as_deref().unwrap_or(""),
                "Provider returned an unusable token"
            );
            return Err(AppError::Unauthorized("authentication failed".to_string()));
        }

        Ok(token)
    }
}

impl Default for OAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

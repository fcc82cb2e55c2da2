use std::collections::HashMap;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use subtle::ConstantTimeEq;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::clients::{OAuthClient, ProviderRegistration};
use crate::features::auth::model::OAuthProvider;
use crate::features::auth::session;
use crate::modules::storage::token::generate_url_safe_token;
use crate::shared::constants::{
    OAUTH_COOKIE_MAX_AGE, OAUTH_REDIRECT_COOKIE, OAUTH_STATE_COOKIE, PASSWORD_IDENTITY,
    SESSION_COOKIE_NAME, SESSION_MAX_AGE, SESSION_TOKEN_BYTES,
};
use crate::shared::validation::safe_redirect_target;

/// Where the browser goes after a started delegated login
pub struct ExchangeStart {
    pub jar: CookieJar,
    pub authorize_url: String,
}

/// Outcome of a completed login
pub struct LoginSuccess {
    pub jar: CookieJar,
    pub redirect_to: String,
}

/// Password login, delegated identity exchange and session verification
pub struct AuthService {
    password: Option<String>,
    session_secret: String,
    providers: HashMap<OAuthProvider, ProviderRegistration>,
    oauth_client: OAuthClient,
    secure_cookies: bool,
}

impl AuthService {
    pub fn new(config: &AuthConfig, public_base_url: &str) -> Self {
        let mut providers = HashMap::new();
        for (provider, client) in [
            (OAuthProvider::Google, &config.google),
            (OAuthProvider::Microsoft, &config.microsoft),
            (OAuthProvider::GitHub, &config.github),
        ] {
            if let Some(client) = client {
                providers.insert(
                    provider,
                    ProviderRegistration::new(provider, client, public_base_url),
                );
            }
        }

        Self {
            password: config.password.clone(),
            session_secret: config.session_secret.clone(),
            providers,
            oauth_client: OAuthClient::new(),
            secure_cookies: public_base_url.starts_with("https://"),
        }
    }

    /// Replace a provider registration (custom endpoints)
    pub fn with_registration(mut self, registration: ProviderRegistration) -> Self {
        self.providers.insert(registration.provider, registration);
        self
    }

    /// False means open access: every request is authenticated
    pub fn is_enabled(&self) -> bool {
        self.password.is_some() || !self.providers.is_empty()
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn has_provider(&self, provider: OAuthProvider) -> bool {
        self.providers.contains_key(&provider)
    }

    /// A request is authenticated when auth is off or it carries a valid session
    pub fn is_authenticated(&self, jar: &CookieJar) -> bool {
        if !self.is_enabled() {
            return true;
        }
        jar.get(SESSION_COOKIE_NAME)
            .is_some_and(|cookie| session::verify(cookie.value(), &self.session_secret))
    }

    /// Constant-time comparison against the configured password.
    ///
    /// Always false when no password is configured.
    pub fn check_password(&self, candidate: &str) -> bool {
        match &self.password {
            Some(expected) => expected.as_bytes().ct_eq(candidate.as_bytes()).into(),
            None => false,
        }
    }

    /// Verify the password and issue a session on success
    pub fn password_login(
        &self,
        jar: CookieJar,
        candidate: &str,
        redirect: Option<&str>,
    ) -> Result<LoginSuccess> {
        if !self.check_password(candidate) {
            tracing::warn!("Rejected password login attempt");
            return Err(AppError::Unauthorized("invalid credentials".to_string()));
        }

        tracing::info!("Password login succeeded");
        Ok(LoginSuccess {
            jar: jar.add(self.session_cookie(PASSWORD_IDENTITY)?),
            redirect_to: safe_redirect_target(redirect),
        })
    }

    /// Drop the session cookie
    pub fn logout(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
    }

    /// Start the authorization-code flow.
    ///
    /// Stores a fresh anti-forgery state and the sanitized post-login target in
    /// short-lived cookies.
    pub fn begin_exchange(
        &self,
        jar: CookieJar,
        provider: OAuthProvider,
        redirect: Option<&str>,
    ) -> Result<ExchangeStart> {
        let registration = self.registration(provider)?;
        let state = generate_url_safe_token(SESSION_TOKEN_BYTES)?;
        let authorize_url = self.oauth_client.authorize_url(registration, &state)?;

        let jar = jar
            .add(self.build_cookie(OAUTH_STATE_COOKIE, state, OAUTH_COOKIE_MAX_AGE))
            .add(self.build_cookie(
                OAUTH_REDIRECT_COOKIE,
                safe_redirect_target(redirect),
                OAUTH_COOKIE_MAX_AGE,
            ));

        tracing::debug!(provider = %provider, "Redirecting to identity provider");
        Ok(ExchangeStart { jar, authorize_url })
    }

    /// Finish the authorization-code flow.
    ///
    /// The returned state must equal the stored one before the code is
    /// exchanged. Failures carry no detail beyond a generic message.
    pub async fn complete_exchange(
        &self,
        jar: CookieJar,
        provider: OAuthProvider,
        returned_state: Option<&str>,
        code: Option<&str>,
    ) -> Result<LoginSuccess> {
        let registration = self.registration(provider)?;

        let stored_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
        let state_matches = match (stored_state.as_deref(), returned_state) {
            (Some(stored), Some(returned)) if !stored.is_empty() => {
                stored.as_bytes().ct_eq(returned.as_bytes()).into()
            }
            _ => false,
        };
        if !state_matches {
            tracing::warn!(provider = %provider, "OAuth callback state mismatch");
            return Err(AppError::BadRequest("invalid state".to_string()));
        }

        let code = code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::BadRequest("invalid request".to_string()))?;

        self.oauth_client.exchange_code(registration, code).await?;

        let redirect_to = safe_redirect_target(jar.get(OAUTH_REDIRECT_COOKIE).map(|c| c.value()));
        let jar = jar
            .remove(Cookie::build(OAUTH_STATE_COOKIE).path("/"))
            .remove(Cookie::build(OAUTH_REDIRECT_COOKIE).path("/"))
            .add(self.session_cookie(provider.name())?);

        tracing::info!(provider = %provider, "Delegated login succeeded");
        Ok(LoginSuccess { jar, redirect_to })
    }

    fn registration(&self, provider: OAuthProvider) -> Result<&ProviderRegistration> {
        self.providers.get(&provider).ok_or_else(|| {
            AppError::BadRequest(format!("{} login is not configured", provider))
        })
    }

    fn session_cookie(&self, identity_label: &str) -> Result<Cookie<'static>> {
        let credential = session::issue(identity_label, &self.session_secret)?;
        Ok(self.build_cookie(
            SESSION_COOKIE_NAME,
            credential.to_cookie_value(),
            SESSION_MAX_AGE,
        ))
    }

    fn build_cookie(
        &self,
        name: &'static str,
        value: String,
        max_age: std::time::Duration,
    ) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::seconds(max_age.as_secs() as i64))
            .build()
    }
}

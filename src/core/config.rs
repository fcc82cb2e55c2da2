use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::shared::validation::first_non_empty;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub media: MediaConfig,
    pub auth: AuthConfig,
    pub fax: FaxConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Externally reachable base URL; the fax provider fetches uploads from here
    pub public_base_url: String,
    /// Optional ngrok agent API used to discover a tunnel URL at startup
    pub ngrok_api_url: Option<String>,
    /// Explicit template directory (otherwise the default search path is used)
    pub template_dir: Option<PathBuf>,
}

/// Upload hosting configuration
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Compliance mode: uploads never touch the disk
    pub hipaa: bool,
    /// Directory for durable uploads; ignored in HIPAA mode
    pub upload_dir: Option<PathBuf>,
    pub cleanup_interval: Duration,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub password: Option<String>,
    pub session_secret: String,
    pub google: Option<OAuthClientConfig>,
    pub microsoft: Option<OAuthClientConfig>,
    pub github: Option<OAuthClientConfig>,
}

#[derive(Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Clone)]
pub struct FaxConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub default_from: Option<String>,
    pub default_connection_id: Option<String>,
    pub fax_application_id: Option<String>,
}

// Secrets stay out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("session_secret", &"***")
            .field("google", &self.google.is_some())
            .field("microsoft", &self.microsoft.is_some())
            .field("github", &self.github.is_some())
            .finish()
    }
}

impl std::fmt::Debug for FaxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaxConfig")
            .field("api_key", &"***")
            .field("api_base_url", &self.api_base_url)
            .field("default_from", &self.default_from)
            .field("default_connection_id", &self.default_connection_id)
            .field("fax_application_id", &self.fax_application_id)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            media: MediaConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            fax: FaxConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let public_base_url = non_empty_var("PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        Ok(Self {
            host,
            port,
            public_base_url,
            ngrok_api_url: non_empty_var("NGROK_API_URL"),
            template_dir: non_empty_var("TEMPLATE_DIR").map(PathBuf::from),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl MediaConfig {
    const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes

    pub fn from_env() -> Result<Self, String> {
        let mut hipaa_raw = env::var("HIPAA_MODE").unwrap_or_default();
        if hipaa_raw.is_empty() {
            if let Some(legacy) = non_empty_var("HIPPA_MODE") {
                tracing::warn!("HIPPA_MODE is deprecated, use HIPAA_MODE instead");
                hipaa_raw = legacy;
            }
        }

        let cleanup_interval_secs = env::var("MEDIA_CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CLEANUP_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "MEDIA_CLEANUP_INTERVAL_SECS must be a valid number".to_string())?;
        if cleanup_interval_secs == 0 {
            return Err("MEDIA_CLEANUP_INTERVAL_SECS must be greater than zero".to_string());
        }

        Ok(Self {
            hipaa: parse_flag(&hipaa_raw),
            upload_dir: non_empty_var("UPLOAD_DIR").map(PathBuf::from),
            cleanup_interval: Duration::from_secs(cleanup_interval_secs),
        })
    }

    /// Directory used for durable storage, if durable storage is in effect.
    ///
    /// HIPAA mode always wins over a configured directory.
    pub fn durable_dir(&self) -> Option<&PathBuf> {
        if self.hipaa {
            None
        } else {
            self.upload_dir.as_ref()
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true") || raw == "1"
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, String> {
        let password = non_empty_var("AUTH_PASSWORD");
        let session_secret = non_empty_var("SESSION_SECRET");

        let google = OAuthClientConfig::from_env("GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET");
        let microsoft =
            OAuthClientConfig::from_env("MICROSOFT_CLIENT_ID", "MICROSOFT_CLIENT_SECRET");
        let github = OAuthClientConfig::from_env("GITHUB_CLIENT_ID", "GITHUB_CLIENT_SECRET");

        let session_secret = resolve_session_secret(
            session_secret,
            password.as_deref(),
            google.is_some() || microsoft.is_some() || github.is_some(),
        )?;

        Ok(Self {
            password,
            session_secret,
            google,
            microsoft,
            github,
        })
    }
}

/// Pick the session signing secret.
///
/// A password-only deployment without a secret gets a deterministic default
/// derived from the password, so sessions survive restarts. Identity providers
/// without a secret are rejected: there is nothing stable to derive from.
fn resolve_session_secret(
    configured: Option<String>,
    password: Option<&str>,
    has_providers: bool,
) -> Result<String, String> {
    if let Some(secret) = configured {
        return Ok(secret);
    }
    match password {
        Some(password) => {
            tracing::warn!(
                "SESSION_SECRET not set, deriving a default from AUTH_PASSWORD. \
                 Changing the password invalidates all sessions. Set SESSION_SECRET for production."
            );
            let prefix: String = password.chars().take(10).collect();
            Ok(format!("change-me-{}", prefix))
        }
        None if has_providers => Err(
            "SESSION_SECRET must be set when an OAuth provider is configured".to_string(),
        ),
        None => Ok(String::new()),
    }
}

impl OAuthClientConfig {
    fn from_env(id_var: &str, secret_var: &str) -> Option<Self> {
        let client_id = non_empty_var(id_var)?;
        Some(Self {
            client_id,
            client_secret: env::var(secret_var).unwrap_or_default(),
        })
    }
}

impl FaxConfig {
    const DEFAULT_API_BASE_URL: &'static str = "https://api.telnyx.com/v2";

    pub fn from_env() -> Result<Self, String> {
        let api_key = non_empty_var("TELNYX_API_KEY")
            .ok_or_else(|| "TELNYX_API_KEY environment variable is required".to_string())?;

        let api_base_url = env::var("TELNYX_API_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let default_from = first_non_empty(&[
            env::var("FAX_FROM_DEFAULT").unwrap_or_default(),
            env::var("FROM_NUMBER").unwrap_or_default(),
        ]);
        let default_connection_id = first_non_empty(&[
            env::var("FAX_CONNECTION_ID").unwrap_or_default(),
            env::var("TELNYX_CONNECTION_ID").unwrap_or_default(),
        ]);

        Ok(Self {
            api_key,
            api_base_url,
            default_from,
            default_connection_id,
            fax_application_id: non_empty_var("FAX_APPLICATION_ID"),
        })
    }
}

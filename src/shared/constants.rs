use std::time::Duration;

// =============================================================================
// MEDIA CONSTANTS
// =============================================================================

/// Random bytes per media token (hex encoded, 64 characters)
pub const MEDIA_TOKEN_BYTES: usize = 32;

/// How long an in-memory upload stays fetchable
pub const MEDIA_TTL: Duration = Duration::from_secs(30 * 60);

/// Content type stored when the upload did not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Multipart field carrying the uploaded document
pub const MEDIA_FILE_FIELD: &str = "media_file";

/// Maximum accepted body for the fax form (multipart included)
pub const MAX_FAX_FORM_SIZE: usize = 25 * 1024 * 1024;

// =============================================================================
// SESSION CONSTANTS
// =============================================================================

pub const SESSION_COOKIE_NAME: &str = "fax_ui_session";

/// Random bytes per session token (base64url encoded)
pub const SESSION_TOKEN_BYTES: usize = 32;

pub const SESSION_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

pub const OAUTH_REDIRECT_COOKIE: &str = "oauth_redirect";

/// Lifetime of the anti-forgery state and post-login redirect cookies
pub const OAUTH_COOKIE_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Identity label for sessions created by the password form
pub const PASSWORD_IDENTITY: &str = "password";

// =============================================================================
// FAX API CONSTANTS
// =============================================================================

pub const FAX_CREATE_TIMEOUT: Duration = Duration::from_secs(30);

pub const FAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const FAX_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_PAGE_SIZE: i64 = 10;

pub const ALLOWED_FAX_QUALITIES: &[&str] =
    &["normal", "high", "very_high", "ultra_light", "ultra_dark"];

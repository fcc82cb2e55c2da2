use serde::Deserialize;

/// Password login form body
#[derive(Debug, Deserialize)]
pub struct LoginFormDto {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Query string of the login page
#[derive(Debug, Default, Deserialize)]
pub struct LoginQueryDto {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Query string of `/auth/login/{provider}`
#[derive(Debug, Default, Deserialize)]
pub struct OAuthLoginQueryDto {
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Query string the provider appends to the callback URL
#[derive(Debug, Default, Deserialize)]
pub struct OAuthCallbackQueryDto {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

use std::fmt;
use std::str::FromStr;

/// Parsed session cookie: `token.signature.identity_label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    pub token: String,
    pub signature: String,
    /// How the session was obtained ("password" or a provider name)
    pub identity_label: String,
}

impl SessionCredential {
    /// Split a cookie value into its three parts.
    ///
    /// The label is everything after the second dot.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.splitn(3, '.');
        let token = parts.next()?;
        let signature = parts.next()?;
        let identity_label = parts.next()?;
        if token.is_empty() || signature.is_empty() {
            return None;
        }
        Some(Self {
            token: token.to_string(),
            signature: signature.to_string(),
            identity_label: identity_label.to_string(),
        })
    }

    pub fn to_cookie_value(&self) -> String {
        format!("{}.{}.{}", self.token, self.signature, self.identity_label)
    }
}

/// Supported delegated identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Google,
    Microsoft,
    GitHub,
}

/// Authorization and token endpoints of a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub auth_url: String,
    pub token_url: String,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [
        OAuthProvider::Google,
        OAuthProvider::Microsoft,
        OAuthProvider::GitHub,
    ];

    /// Path segment and session label
    pub fn name(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Microsoft => "microsoft",
            OAuthProvider::GitHub => "github",
        }
    }

    pub fn scopes(&self) -> &'static [&'static str] {
        match self {
            OAuthProvider::Google => &["https://www.googleapis.com/auth/userinfo.email"],
            OAuthProvider::Microsoft => &["User.Read"],
            OAuthProvider::GitHub => &["user:email"],
        }
    }

    pub fn default_endpoints(&self) -> ProviderEndpoints {
        let (auth_url, token_url) = match self {
            OAuthProvider::Google => (
                "https://accounts.google.com/o/oauth2/auth",
                "https://oauth2.googleapis.com/token",
            ),
            OAuthProvider::Microsoft => (
                "https://login.microsoftonline.com/common/oauth2/v2.0/authorize",
                "https://login.microsoftonline.com/common/oauth2/v2.0/token",
            ),
            OAuthProvider::GitHub => (
                "https://github.com/login/oauth/authorize",
                "https://github.com/login/oauth/access_token",
            ),
        };
        ProviderEndpoints {
            auth_url: auth_url.to_string(),
            token_url: token_url.to_string(),
        }
    }
}

impl FromStr for OAuthProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(OAuthProvider::Google),
            "microsoft" => Ok(OAuthProvider::Microsoft),
            "github" => Ok(OAuthProvider::GitHub),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_parts() {
        let credential = SessionCredential::parse("tok.sig.password").unwrap();
        assert_eq!(credential.token, "tok");
        assert_eq!(credential.signature, "sig");
        assert_eq!(credential.identity_label, "password");
        assert_eq!(credential.to_cookie_value(), "tok.sig.password");
    }

    #[test]
    fn test_label_may_contain_dots() {
        let credential = SessionCredential::parse("tok.sig.a.b").unwrap();
        assert_eq!(credential.identity_label, "a.b");
    }

    #[test]
    fn test_malformed_values() {
        assert!(SessionCredential::parse("").is_none());
        assert!(SessionCredential::parse("tok").is_none());
        assert!(SessionCredential::parse("tok.sig").is_none());
        assert!(SessionCredential::parse(".sig.password").is_none());
        assert!(SessionCredential::parse("tok..password").is_none());
    }

    #[test]
    fn test_provider_names_round_trip() {
        for provider in OAuthProvider::ALL {
            assert_eq!(provider.name().parse::<OAuthProvider>(), Ok(provider));
        }
        assert!("facebook".parse::<OAuthProvider>().is_err());
    }
}

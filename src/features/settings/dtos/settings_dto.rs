use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Banner flags after a redirect back to the settings page
#[derive(Debug, Default, Deserialize)]
pub struct SettingsQueryDto {
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Trimmed value, with blank inputs treated as not supplied
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

/// Settings form. Fields left blank keep their current value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSettingsDto {
    #[validate(email(message = "Email recipient must be a valid email address"))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub fax_email_recipient: Option<String>,

    #[validate(url(message = "Webhook URL must be a valid URL"))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub webhook_event_url: Option<String>,

    #[validate(url(message = "Failover webhook URL must be a valid URL"))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub webhook_event_failover_url: Option<String>,

    /// Ignored unless a positive integer
    #[serde(default, deserialize_with = "blank_as_none")]
    pub webhook_timeout_secs: Option<String>,

    /// Ignored unless an integer
    #[serde(default, deserialize_with = "blank_as_none")]
    pub channel_limit: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::SIP_SUBDOMAIN_REGEX",
        message = "SIP subdomain may only contain letters, digits and dashes"
    ))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sip_subdomain: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub sip_subdomain_receive_settings: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> UpdateSettingsDto {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_blank_fields_are_none() {
        let dto = parse(json!({
            "fax_email_recipient": " ",
            "channel_limit": "",
            "sip_subdomain": "acme"
        }));
        assert_eq!(dto.fax_email_recipient, None);
        assert_eq!(dto.channel_limit, None);
        assert_eq!(dto.webhook_event_url, None);
        assert_eq!(dto.sip_subdomain.as_deref(), Some("acme"));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        assert!(parse(json!({"fax_email_recipient": "not-an-email"}))
            .validate()
            .is_err());
        assert!(parse(json!({"webhook_event_url": "not a url"}))
            .validate()
            .is_err());
        assert!(parse(json!({"sip_subdomain": "front.desk"}))
            .validate()
            .is_err());
        assert!(parse(json!({"webhook_event_url": "https://hooks.example/fax"}))
            .validate()
            .is_ok());
    }
}

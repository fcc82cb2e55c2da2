use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::settings::dtos::UpdateSettingsDto;
use crate::modules::telnyx::{FaxApi, FaxApplication, InboundUpdate, UpdateFaxApplicationRequest};

/// Overlay the supplied form fields onto the current application.
///
/// Name and webhook URL are always carried over. The inbound block is only
/// sent when one of its fields was supplied.
pub fn build_update(
    current: &FaxApplication,
    form: &UpdateSettingsDto,
) -> UpdateFaxApplicationRequest {
    let inbound = InboundUpdate {
        channel_limit: form
            .channel_limit
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok()),
        sip_subdomain: form.sip_subdomain.clone(),
        sip_subdomain_receive_settings: form.sip_subdomain_receive_settings.clone(),
    };
    let has_inbound = inbound != InboundUpdate::default();

    UpdateFaxApplicationRequest {
        application_name: current.application_name.clone(),
        webhook_event_url: form
            .webhook_event_url
            .clone()
            .unwrap_or_else(|| current.webhook_event_url.clone()),
        webhook_event_failover_url: form.webhook_event_failover_url.clone(),
        webhook_timeout_secs: form
            .webhook_timeout_secs
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|secs| *secs > 0),
        fax_email_recipient: form.fax_email_recipient.clone(),
        inbound: has_inbound.then_some(inbound),
    }
}

/// Result of a settings submission the provider answered
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Saved,
    /// Provider refused the change; shown to the user as a banner
    Rejected(String),
}

/// Fax application settings, available when an application ID is configured
pub struct SettingsService {
    api: Arc<dyn FaxApi>,
    application_id: Option<String>,
    connection_id: Option<String>,
}

impl SettingsService {
    pub fn new(
        api: Arc<dyn FaxApi>,
        application_id: Option<String>,
        connection_id: Option<String>,
    ) -> Self {
        Self {
            api,
            application_id,
            connection_id,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.application_id.is_some()
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }

    pub fn application_id(&self) -> Result<&str> {
        self.application_id.as_deref().ok_or_else(|| {
            AppError::NotFound(
                "Settings are only available when a fax application ID is configured. \
                 Set the FAX_APPLICATION_ID environment variable."
                    .to_string(),
            )
        })
    }

    pub async fn current(&self) -> Result<FaxApplication> {
        let id = self.application_id()?;
        self.api.get_fax_application(id).await.map_err(|e| {
            AppError::ExternalServiceError(format!(
                "Failed to fetch fax application settings: {}",
                external_message(e)
            ))
        })
    }

    /// Validate the form, fetch the current application, overlay the form
    /// and PATCH it back.
    ///
    /// A failure to read the current settings is an error. Invalid input or a
    /// refused update is an [`UpdateOutcome::Rejected`].
    pub async fn update(&self, form: &UpdateSettingsDto) -> Result<UpdateOutcome> {
        let id = self.application_id()?;
        if let Err(e) = form.validate() {
            return Ok(UpdateOutcome::Rejected(e.to_string()));
        }
        let current = self.current().await?;
        let request = build_update(&current, form);

        match self.api.update_fax_application(id, request).await {
            Ok(_) => Ok(UpdateOutcome::Saved),
            Err(e) => {
                let message = external_message(e);
                tracing::warn!("Fax application update rejected: {}", message);
                Ok(UpdateOutcome::Rejected(message))
            }
        }
    }
}

fn external_message(error: AppError) -> String {
    match error {
        AppError::ExternalServiceError(msg) => msg,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::telnyx::models::FaxApplicationInbound;
    use crate::shared::test_helpers::FakeFaxApi;

    fn application() -> FaxApplication {
        FaxApplication {
            id: "app-1".to_string(),
            application_name: "Front desk".to_string(),
            webhook_event_url: "https://hooks.example/old".to_string(),
            inbound: Some(FaxApplicationInbound {
                channel_limit: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_form_keeps_required_fields_only() {
        let request = build_update(&application(), &UpdateSettingsDto::default());
        assert_eq!(request.application_name, "Front desk");
        assert_eq!(request.webhook_event_url, "https://hooks.example/old");
        assert_eq!(request.fax_email_recipient, None);
        assert_eq!(request.inbound, None);
    }

    #[test]
    fn test_filled_fields_overlay_current() {
        let form = UpdateSettingsDto {
            webhook_event_url: Some("https://hooks.example/new".to_string()),
            fax_email_recipient: Some("ops@example.com".to_string()),
            webhook_timeout_secs: Some("0".to_string()),
            channel_limit: Some("7".to_string()),
            ..Default::default()
        };
        let request = build_update(&application(), &form);
        assert_eq!(request.webhook_event_url, "https://hooks.example/new");
        assert_eq!(request.fax_email_recipient.as_deref(), Some("ops@example.com"));
        assert_eq!(request.webhook_timeout_secs, None);
        assert_eq!(
            request.inbound,
            Some(InboundUpdate {
                channel_limit: Some(7),
                ..Default::default()
            })
        );
    }

    #[tokio::test]
    async fn test_disabled_without_application_id() {
        let service = SettingsService::new(Arc::new(FakeFaxApi::default()), None, None);
        assert!(!service.is_enabled());
        assert!(matches!(service.current().await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_form_is_rejected_before_patch() {
        let api = Arc::new(FakeFaxApi::with_application(application()));
        let service = SettingsService::new(api.clone(), Some("app-1".to_string()), None);
        let form = UpdateSettingsDto {
            fax_email_recipient: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&form).await.unwrap(),
            UpdateOutcome::Rejected(_)
        ));
        assert!(api.last_update().is_none());
    }

    #[tokio::test]
    async fn test_update_reports_provider_rejection() {
        let api = Arc::new(FakeFaxApi::with_application(application()).failing_updates());
        let service = SettingsService::new(api, Some("app-1".to_string()), None);
        match service.update(&UpdateSettingsDto::default()).await.unwrap() {
            UpdateOutcome::Rejected(message) => assert!(message.contains("invalid webhook")),
            UpdateOutcome::Saved => panic!("update should have been rejected"),
        }
    }
}

//! Router composition and startup wiring shared by `main` and tests.

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Router};

use crate::core::middleware;
use crate::features::auth::{self, AuthService, AuthState};
use crate::features::faxes::{self, FaxService, FaxState};
use crate::features::media::{self, MediaService};
use crate::features::settings::{self, SettingsService, SettingsState};
use crate::modules::telnyx::FaxApi;
use crate::shared::constants::FAX_STARTUP_TIMEOUT;
use crate::shared::templates::TemplateEngine;

/// Everything the router needs
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub media: Arc<MediaService>,
    pub faxes: Arc<FaxService>,
    pub settings: Arc<SettingsService>,
    pub templates: Arc<TemplateEngine>,
}

/// Public login and media routes plus the session-gated fax pages
pub fn build_router(services: &AppServices) -> Router {
    let protected_routes = Router::new()
        .merge(faxes::routes(FaxState {
            service: Arc::clone(&services.faxes),
            templates: Arc::clone(&services.templates),
        }))
        .merge(settings::routes(SettingsState {
            service: Arc::clone(&services.settings),
            templates: Arc::clone(&services.templates),
        }))
        .route_layer(from_fn_with_state(
            Arc::clone(&services.auth),
            middleware::require_session,
        ));

    // The fax provider fetches uploads without a session
    let public_routes = Router::new()
        .merge(auth::routes(AuthState {
            service: Arc::clone(&services.auth),
            templates: Arc::clone(&services.templates),
        }))
        .merge(media::routes(Arc::clone(&services.media)));

    Router::new().merge(protected_routes).merge(public_routes)
}

/// Default connection ID when only a fax application ID is configured.
///
/// The application's own ID doubles as its connection ID. Lookup failures
/// are logged and leave the default unset.
pub async fn detect_connection_id(api: &dyn FaxApi, application_id: &str) -> Option<String> {
    match tokio::time::timeout(FAX_STARTUP_TIMEOUT, api.get_fax_application(application_id)).await
    {
        Ok(Ok(application)) if !application.id.is_empty() => {
            tracing::info!(
                "Using fax application ID as connection ID: {}",
                application.id
            );
            Some(application.id)
        }
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            tracing::warn!("Could not fetch fax application details: {}", e);
            None
        }
        Err(_) => {
            tracing::warn!(
                "Timed out fetching fax application details after {}s",
                FAX_STARTUP_TIMEOUT.as_secs()
            );
            None
        }
    }
}

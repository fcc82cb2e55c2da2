use crate::features::settings::handlers;
use crate::features::settings::services::SettingsService;
use crate::shared::templates::TemplateEngine;
use axum::{routing::get, Router};
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsState {
    pub service: Arc<SettingsService>,
    pub templates: Arc<TemplateEngine>,
}

pub fn routes(state: SettingsState) -> Router {
    Router::new()
        .route(
            "/settings",
            get(handlers::show_settings).post(handlers::update_settings),
        )
        .with_state(state)
}

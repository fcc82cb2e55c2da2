use crate::features::faxes::handlers;
use crate::features::faxes::services::FaxService;
use crate::shared::constants::MAX_FAX_FORM_SIZE;
use crate::shared::templates::TemplateEngine;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

#[derive(Clone)]
pub struct FaxState {
    pub service: Arc<FaxService>,
    pub templates: Arc<TemplateEngine>,
}

/// Fax pages (session required when auth is configured)
pub fn routes(state: FaxState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/fax",
            get(handlers::show_fax)
                .post(handlers::send_fax)
                .layer(DefaultBodyLimit::max(MAX_FAX_FORM_SIZE)),
        )
        .route("/faxes", get(handlers::list_faxes))
        .with_state(state)
}

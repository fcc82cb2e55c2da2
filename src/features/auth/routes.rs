use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use crate::shared::templates::TemplateEngine;
use axum::{routing::get, Router};
use std::sync::Arc;

/// State shared by the login pages and the session gate
#[derive(Clone)]
pub struct AuthState {
    pub service: Arc<AuthService>,
    pub templates: Arc<TemplateEngine>,
}

/// Public auth routes (no session required)
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login_submit),
        )
        .route("/logout", get(handlers::logout).post(handlers::logout))
        .route("/auth/login/{provider}", get(handlers::oauth_login))
        .route("/auth/callback/{provider}", get(handlers::oauth_callback))
        .with_state(state)
}

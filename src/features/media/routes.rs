use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::media::handlers::serve_media;
use crate::features::media::services::MediaService;

/// Public media routes (token-secured, no session)
pub fn routes(media_service: Arc<MediaService>) -> Router {
    Router::new()
        .route("/media/{token}", get(serve_media))
        .with_state(media_service)
}

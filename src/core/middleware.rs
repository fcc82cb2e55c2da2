use crate::features::auth::AuthService;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        // Path only: query strings may carry OAuth codes
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
        )
    }
}

/// Gate for the fax pages.
///
/// Passes through when auth is disabled or the session cookie verifies,
/// otherwise sends the browser to the login page with the current path.
pub async fn require_session(
    State(service): State<Arc<AuthService>>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    if service.is_authenticated(&jar) {
        return next.run(req).await;
    }

    let location = format!(
        "/login?redirect={}",
        urlencoding::encode(req.uri().path())
    );
    Redirect::to(&location).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::auth::session;
    use crate::shared::constants::SESSION_COOKIE_NAME;
    use axum::http::{header, StatusCode};
    use axum::{middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;

    fn app(password: Option<&str>) -> TestServer {
        let config = AuthConfig {
            password: password.map(str::to_string),
            session_secret: "test-secret".to_string(),
            google: None,
            microsoft: None,
            github: None,
        };
        let service = Arc::new(AuthService::new(&config, "http://localhost"));
        let router = Router::new()
            .route("/faxes", get(|| async { "protected" }))
            .route_layer(from_fn_with_state(service, require_session));
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_open_access_without_auth() {
        let response = app(None).get("/faxes").await;
        response.assert_status_ok();
        response.assert_text("protected");
    }

    #[tokio::test]
    async fn test_redirects_to_login_without_session() {
        let response = app(Some("pw")).get("/faxes").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login?redirect=%2Ffaxes"
        );
    }

    #[tokio::test]
    async fn test_valid_session_passes() {
        let credential = session::issue("password", "test-secret").unwrap();
        let response = app(Some("pw"))
            .get("/faxes")
            .add_cookie(cookie::Cookie::new(
                SESSION_COOKIE_NAME,
                credential.to_cookie_value(),
            ))
            .await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_session_signed_with_other_secret_is_refused() {
        let credential = session::issue("password", "another-secret").unwrap();
        let response = app(Some("pw"))
            .get("/faxes")
            .add_cookie(cookie::Cookie::new(
                SESSION_COOKIE_NAME,
                credential.to_cookie_value(),
            ))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let request = axum::http::Request::new(());
        let mut maker = MakeRequestUuid;
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}

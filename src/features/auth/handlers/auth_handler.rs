use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use minijinja::context;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    LoginFormDto, LoginQueryDto, OAuthCallbackQueryDto, OAuthLoginQueryDto,
};
use crate::features::auth::model::OAuthProvider;
use crate::features::auth::routes::AuthState;
use crate::shared::validation::safe_redirect_target;

fn parse_provider(name: &str) -> Result<OAuthProvider> {
    name.parse()
        .map_err(|_| AppError::BadRequest("unknown provider".to_string()))
}

/// Show the login page
pub async fn login_page(
    State(state): State<AuthState>,
    jar: CookieJar,
    Query(query): Query<LoginQueryDto>,
) -> Result<Response> {
    if !state.service.is_enabled() {
        return Ok(Redirect::to("/").into_response());
    }

    if state.service.is_authenticated(&jar) {
        let target = safe_redirect_target(query.redirect.as_deref());
        return Ok(Redirect::to(&target).into_response());
    }

    let page = state.templates.page(
        "login.html",
        context! {
            error => query.error.unwrap_or_default(),
            redirect => query.redirect.unwrap_or_default(),
            has_password => state.service.has_password(),
            has_google => state.service.has_provider(OAuthProvider::Google),
            has_microsoft => state.service.has_provider(OAuthProvider::Microsoft),
            has_github => state.service.has_provider(OAuthProvider::GitHub),
        },
    )?;
    Ok(page.into_response())
}

/// Process the password form
pub async fn login_submit(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(form): Form<LoginFormDto>,
) -> Result<Response> {
    if !state.service.is_enabled() {
        return Ok(Redirect::to("/").into_response());
    }

    match state
        .service
        .password_login(jar, &form.password, form.redirect.as_deref())
    {
        Ok(success) => Ok((success.jar, Redirect::to(&success.redirect_to)).into_response()),
        Err(AppError::Unauthorized(_)) => {
            let target = safe_redirect_target(form.redirect.as_deref());
            let location = format!(
                "/login?error=invalid&redirect={}",
                urlencoding::encode(&target)
            );
            Ok(Redirect::to(&location).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Clear the session and go back to the login page
pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> impl IntoResponse {
    (state.service.logout(jar), Redirect::to("/login"))
}

/// Send the browser to the identity provider
pub async fn oauth_login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Path(provider): Path<String>,
    Query(query): Query<OAuthLoginQueryDto>,
) -> Result<Response> {
    let provider = parse_provider(&provider)?;
    let start = state
        .service
        .begin_exchange(jar, provider, query.redirect.as_deref())?;
    Ok((start.jar, Redirect::temporary(&start.authorize_url)).into_response())
}

/// Provider callback: verify state, exchange the code, start a session
pub async fn oauth_callback(
    State(state): State<AuthState>,
    jar: CookieJar,
    Path(provider): Path<String>,
    Query(query): Query<OAuthCallbackQueryDto>,
) -> Result<Response> {
    let provider = parse_provider(&provider)?;
    let success = state
        .service
        .complete_exchange(jar, provider, query.state.as_deref(), query.code.as_deref())
        .await?;
    Ok((success.jar, Redirect::to(&success.redirect_to)).into_response())
}

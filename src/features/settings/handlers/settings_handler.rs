use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use minijinja::context;

use crate::core::error::Result;
use crate::core::extractor::AppForm;
use crate::features::settings::dtos::{SettingsQueryDto, UpdateSettingsDto};
use crate::features::settings::routes::SettingsState;
use crate::features::settings::services::UpdateOutcome;

/// Current fax application settings
pub async fn show_settings(
    State(state): State<SettingsState>,
    Query(query): Query<SettingsQueryDto>,
) -> Result<Html<String>> {
    let fax_app_id = state.service.application_id()?.to_string();
    let application = state.service.current().await?;

    state.templates.page(
        "settings.html",
        context! {
            application => application,
            fax_app_id => fax_app_id,
            connection_id => state.service.connection_id().unwrap_or_default(),
            success => query.success.as_deref() == Some("true"),
            error => query.error.unwrap_or_default(),
        },
    )
}

/// Apply the settings form and redirect back with a banner
pub async fn update_settings(
    State(state): State<SettingsState>,
    AppForm(form): AppForm<UpdateSettingsDto>,
) -> Result<Redirect> {
    let location = match state.service.update(&form).await? {
        UpdateOutcome::Saved => "/settings?success=true".to_string(),
        UpdateOutcome::Rejected(message) => {
            format!("/settings?error={}", urlencoding::encode(&message))
        }
    };
    Ok(Redirect::to(&location))
}

//! Auto top-up settings routes.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use gridx_core::auto_topup::{AutoTopUpSettings, Frequency, SettingsInput};
use gridx_core::ledger::LedgerError;
use gridx_shared::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use super::{amount_text, format_money};
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the auto top-up routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auto-topup/settings", get(get_settings).post(save_settings))
        .route("/auto-topup/toggle", post(toggle))
}

/// Body of `POST /auto-topup/settings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsBody {
    /// Balance threshold, number or decimal string.
    #[serde(default, alias = "min_balance")]
    pub min_balance: Option<Value>,
    /// Amount per automatic top-up, number or decimal string.
    #[serde(default, alias = "top_up_amount")]
    pub auto_top_up_amount: Option<Value>,
    /// One of `weekly`, `monthly`, `quarterly`.
    #[serde(default, alias = "frequency")]
    pub auto_top_up_frequency: Option<String>,
}

/// Body of `POST /auto-topup/toggle`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleBody {
    /// Desired state.
    #[serde(default, alias = "is_enabled")]
    pub is_enabled: Option<bool>,
}

/// Settings as rendered to clients.
#[derive(Debug, Serialize)]
pub struct SettingsView {
    /// Balance threshold.
    pub min_balance: String,
    /// Amount per automatic top-up.
    pub top_up_amount: String,
    /// Check frequency.
    pub frequency: Frequency,
    /// Whether auto top-up is active.
    pub is_enabled: bool,
}

impl SettingsView {
    /// What clients see before anything was saved.
    fn unconfigured() -> Self {
        Self {
            min_balance: "0".to_string(),
            top_up_amount: "0".to_string(),
            frequency: Frequency::Weekly,
            is_enabled: false,
        }
    }
}

impl From<AutoTopUpSettings> for SettingsView {
    fn from(settings: AutoTopUpSettings) -> Self {
        Self {
            min_balance: format_money(settings.min_balance),
            top_up_amount: format_money(settings.top_up_amount),
            frequency: settings.frequency,
            is_enabled: settings.is_enabled,
        }
    }
}

/// GET /auto-topup/settings
async fn get_settings(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Response, ApiError> {
    let settings = state.auto_top_up().get_settings(auth_user.user_id()).await?;
    let configured = settings.is_some();
    let view = settings.map_or_else(SettingsView::unconfigured, SettingsView::from);

    Ok(Json(json!({
        "success": true,
        "configured": configured,
        "settings": view,
    }))
    .into_response())
}

/// POST /auto-topup/settings
async fn save_settings(
    State(state): State<AppState>,
    auth_user: AuthUser,
    body: Result<Json<SettingsBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let user_id = auth_user.user_id();

    let input = parse_settings(&body).inspect_err(|e| {
        warn!(
            user_id = %user_id,
            operation = "save_auto_top_up_settings",
            amount = ?body.auto_top_up_amount,
            error = %e,
            "Rejected auto top-up settings"
        );
    })?;

    let saved = state.auto_top_up().save_settings(user_id, input).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Auto top-up settings saved",
        "settings": SettingsView::from(saved),
    }))
    .into_response())
}

fn parse_settings(body: &SettingsBody) -> Result<SettingsInput, LedgerError> {
    let min_balance = amount_text(body.min_balance.as_ref(), "Minimum balance")?;
    let top_up_amount = amount_text(body.auto_top_up_amount.as_ref(), "Auto top-up amount")?;
    let frequency = body
        .auto_top_up_frequency
        .as_deref()
        .ok_or_else(|| LedgerError::invalid("Frequency is required"))?;

    SettingsInput::parse(&min_balance, &top_up_amount, frequency)
}

/// POST /auto-topup/toggle
///
/// Answers 404 when the caller never saved settings; nothing is created.
async fn toggle(
    State(state): State<AppState>,
    auth_user: AuthUser,
    body: Result<Json<ToggleBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let enabled = body
        .is_enabled
        .ok_or_else(|| AppError::Validation("isEnabled is required".to_string()))?;

    let updated = state
        .auto_top_up()
        .toggle_enabled(auth_user.user_id(), enabled)
        .await?;

    if !updated {
        return Err(AppError::NotFound("Auto top-up settings not found".to_string()).into());
    }

    Ok(Json(json!({
        "success": true,
        "isEnabled": enabled,
    }))
    .into_response())
}

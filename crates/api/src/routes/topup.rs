//! Top-up and balance routes.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::{JsonRejection, QueryRejection}},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use gridx_core::ledger::TopUpRequest;
use gridx_db::entities::top_ups;
use gridx_shared::types::{PageMeta, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;
use uuid::Uuid;

use super::{amount_text, format_money};
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the top-up routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/topup", post(create_top_up))
        .route("/topup/balance", get(get_balance))
        .route("/topup/history", get(list_top_ups))
}

/// Body of `POST /topup`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpBody {
    /// Amount as a JSON number or decimal string.
    #[serde(default)]
    pub amount: Option<Value>,
    /// Payment channel tag.
    #[serde(default, rename = "type", alias = "transaction_type")]
    pub top_up_type: Option<String>,
    /// Optional promo code.
    #[serde(default, alias = "promo_code")]
    pub promo_code: Option<String>,
    /// Optional voucher code.
    #[serde(default, alias = "voucher_code")]
    pub voucher_code: Option<String>,
}

/// One entry of the top-up history.
#[derive(Debug, Serialize)]
pub struct TopUpItem {
    /// Top-up id.
    pub id: Uuid,
    /// Credited amount.
    pub amount: String,
    /// Payment channel tag.
    #[serde(rename = "type")]
    pub top_up_type: String,
    /// Promo code, if any.
    pub promo_code: Option<String>,
    /// Voucher code, if any.
    pub voucher_code: Option<String>,
    /// When the top-up was recorded.
    pub created_at: DateTime<Utc>,
}

impl From<top_ups::Model> for TopUpItem {
    fn from(model: top_ups::Model) -> Self {
        Self {
            id: model.id,
            amount: format_money(model.amount),
            top_up_type: model.top_up_type,
            promo_code: model.promo_code,
            voucher_code: model.voucher_code,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// POST /topup
async fn create_top_up(
    State(state): State<AppState>,
    auth_user: AuthUser,
    body: Result<Json<TopUpBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let user_id = auth_user.user_id();

    let request = amount_text(body.amount.as_ref(), "Amount").and_then(|raw| {
        TopUpRequest::parse(
            user_id,
            &raw,
            body.top_up_type.as_deref().unwrap_or_default(),
            body.promo_code.as_deref(),
            body.voucher_code.as_deref(),
        )
    });
    let request = match request {
        Ok(request) => request,
        Err(e) => {
            warn!(
                user_id = %user_id,
                operation = "process_top_up",
                amount = ?body.amount,
                error = %e,
                "Rejected top-up"
            );
            return Err(e.into());
        }
    };

    let receipt = state.top_ups().process_top_up(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Top-up successful",
            "top_up_id": receipt.top_up_id,
            "expense_id": receipt.expense_id,
            "notification_id": receipt.notification_id,
            "amount": format_money(receipt.amount),
            "new_balance": format_money(receipt.new_balance),
            "created_at": receipt.created_at,
        })),
    )
        .into_response())
}

/// GET /topup/balance
async fn get_balance(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Response, ApiError> {
    let balance = state.top_ups().get_balance(auth_user.user_id()).await?;

    Ok(Json(json!({
        "success": true,
        "balance": format_money(balance),
        "currency": state.currency,
    }))
    .into_response())
}

/// GET /topup/history
async fn list_top_ups(
    State(state): State<AppState>,
    auth_user: AuthUser,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(page) = query?;
    let result = state
        .top_ups()
        .list_top_ups(auth_user.user_id(), &page)
        .await?
        .map(TopUpItem::from);

    Ok(Json(HistoryResponse {
        success: true,
        data: result.data,
        meta: result.meta,
    })
    .into_response())
}

#[derive(Serialize)]
struct HistoryResponse {
    success: bool,
    data: Vec<TopUpItem>,
    meta: PageMeta,
}

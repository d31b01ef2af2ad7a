//! Expense history routes.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use gridx_db::entities::expenses;
use gridx_shared::types::{PageMeta, PageRequest};
use serde::Serialize;
use uuid::Uuid;

use super::format_money;
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/expenses", get(list_expenses))
}

/// One expense entry.
#[derive(Debug, Serialize)]
pub struct ExpenseItem {
    /// Expense id.
    pub id: Uuid,
    /// Amount.
    pub amount: String,
    /// Free-text purpose.
    pub purpose: String,
    /// Category tag.
    #[serde(rename = "type")]
    pub expense_type: String,
    /// Top-up that produced this expense, if any.
    pub top_up_id: Option<Uuid>,
    /// When the expense was recorded.
    pub created_at: DateTime<Utc>,
}

impl From<expenses::Model> for ExpenseItem {
    fn from(model: expenses::Model) -> Self {
        Self {
            id: model.id,
            amount: format_money(model.amount),
            purpose: model.purpose,
            expense_type: model.expense_type,
            top_up_id: model.top_up_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Serialize)]
struct ExpenseListResponse {
    success: bool,
    data: Vec<ExpenseItem>,
    meta: PageMeta,
}

/// GET /expenses
async fn list_expenses(
    State(state): State<AppState>,
    auth_user: AuthUser,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(page) = query?;
    let result = state
        .expenses()
        .list(auth_user.user_id(), &page)
        .await?
        .map(ExpenseItem::from);

    Ok(Json(ExpenseListResponse {
        success: true,
        data: result.data,
        meta: result.meta,
    })
    .into_response())
}

//! API route definitions.

use axum::{Router, middleware};
use gridx_core::ledger::LedgerError;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auto_topup;
pub mod expenses;
pub mod health;
pub mod notifications;
pub mod topup;

/// Creates the `/api` router. Every route behind it requires a bearer token.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(topup::routes())
        .merge(auto_topup::routes())
        .merge(expenses::routes())
        .merge(notifications::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Reads an amount that clients send either as a JSON number or a string.
fn amount_text(value: Option<&Value>, field: &str) -> Result<String, LedgerError> {
    match value {
        None | Some(Value::Null) => Err(LedgerError::invalid(format!("{field} is required"))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(LedgerError::invalid(format!("{field} must be a number"))),
    }
}

/// Formats a stored amount with exactly two decimal places.
fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for top-ups, balances, auto top-up settings,
//!   expenses and notifications
//! - Authentication middleware
//! - JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Response};
use gridx_db::{
    AutoTopUpRepository, ExpenseRepository, NotificationRepository, TopUpRepository,
};
use gridx_shared::types::Currency;
use gridx_shared::{AppError, JwtService};
use sea_orm::DatabaseConnection;
use tower::{BoxError, ServiceBuilder};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Upper bound on each storage operation.
    pub storage_timeout: Duration,
    /// Upper bound on a whole HTTP request.
    pub request_timeout: Duration,
    /// Currency used in notification text.
    pub currency: Currency,
}

impl AppState {
    /// Top-up repository bound to this state's pool and limits.
    #[must_use]
    pub fn top_ups(&self) -> TopUpRepository {
        TopUpRepository::new((*self.db).clone())
            .with_timeout(self.storage_timeout)
            .with_currency(self.currency)
    }

    /// Auto top-up settings repository.
    #[must_use]
    pub fn auto_top_up(&self) -> AutoTopUpRepository {
        AutoTopUpRepository::new((*self.db).clone())
            .with_timeout(self.storage_timeout)
            .with_currency(self.currency)
    }

    /// Expense repository.
    #[must_use]
    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new((*self.db).clone()).with_timeout(self.storage_timeout)
    }

    /// Notification repository.
    #[must_use]
    pub fn notifications(&self) -> NotificationRepository {
        NotificationRepository::new((*self.db).clone()).with_timeout(self.storage_timeout)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes_with_state(state.clone()));

    with_request_timeout(routes, state.request_timeout)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(SetSensitiveRequestHeadersLayer::new(std::iter::once(
            AUTHORIZATION,
        )))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bounds every request; an expired request renders as a JSON error.
fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_request_error))
            .timeout(timeout),
    )
}

async fn handle_request_error(err: BoxError) -> Response {
    let err = if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        AppError::OutcomeUnknown(
            "The request timed out and may have been applied. \
             Check your balance or history before retrying"
                .to_string(),
        )
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        AppError::Internal("Internal server error".to_string())
    };
    error::ApiError(err).into_response()
}

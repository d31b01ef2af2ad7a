//! Notification inbox routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::{PathRejection, QueryRejection}},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use gridx_db::entities::notifications;
use gridx_shared::AppError;
use gridx_shared::types::{NotificationId, PageMeta, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the notification routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/{id}/read", put(mark_read))
}

/// Query parameters for listing notifications.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// Only return unread notifications.
    #[serde(default)]
    pub unread_only: bool,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// One notification.
#[derive(Debug, Serialize)]
pub struct NotificationItem {
    /// Notification id.
    pub id: Uuid,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Severity tag.
    #[serde(rename = "type")]
    pub notification_type: String,
    /// Whether the user has seen it.
    pub is_read: bool,
    /// When it was written.
    pub created_at: DateTime<Utc>,
}

impl From<notifications::Model> for NotificationItem {
    fn from(model: notifications::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            message: model.message,
            notification_type: model.notification_type,
            is_read: model.is_read,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Serialize)]
struct NotificationListResponse {
    success: bool,
    notifications: Vec<NotificationItem>,
    unread: u64,
    meta: PageMeta,
}

/// GET /notifications
async fn list_notifications(
    State(state): State<AppState>,
    auth_user: AuthUser,
    query: Result<Query<NotificationQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let repo = state.notifications();
    let result = repo
        .list(auth_user.user_id(), query.unread_only, &page)
        .await?
        .map(NotificationItem::from);
    let unread = repo.unread_count(auth_user.user_id()).await?;

    Ok(Json(NotificationListResponse {
        success: true,
        notifications: result.data,
        unread,
        meta: result.meta,
    })
    .into_response())
}

/// PUT /notifications/{id}/read
async fn mark_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = path?;

    let updated = state
        .notifications()
        .mark_read(auth_user.user_id(), NotificationId::from_uuid(id))
        .await?;

    if !updated {
        return Err(AppError::NotFound("Notification not found".to_string()).into());
    }

    Ok(Json(serde_json::json!({ "success": true })).into_response())
}

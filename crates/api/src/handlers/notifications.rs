//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`] and only ever
//! touch the caller's own notifications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use buildup_core::error::CoreError;
use buildup_db::repositories::NotificationRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unseen notifications. Defaults to `false`.
    pub unseen_only: Option<bool>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Maximum page size for notification listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for notification listing.
const DEFAULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
///
/// List the authenticated user's notifications with optional filtering.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let unseen_only = params.unseen_only.unwrap_or(false);

    let notifications =
        NotificationRepo::list_for_owner(&state.pool, &auth.user_id, unseen_only, limit, offset)
            .await?;

    Ok(Json(serde_json::json!({ "data": notifications })))
}

/// GET /api/v1/notifications/unseen-count
///
/// The number of unseen notifications for the authenticated user.
pub async fn unseen_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unseen_count(&state.pool, &auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}

/// POST /api/v1/notifications/{id}/seen
///
/// Mark a single notification as seen. Returns 204 No Content on
/// success, or 404 if the notification does not belong to the
/// authenticated user.
pub async fn mark_seen(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let found = NotificationRepo::mark_seen(&state.pool, &notification_id, &auth.user_id).await?;

    if !found {
        return Err(AppError::Core(CoreError::not_found(
            "notification",
            notification_id,
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

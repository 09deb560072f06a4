//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET  /              -> list_notifications (?unseen_only, limit, offset)
/// GET  /unseen-count  -> unseen_count
/// POST /{id}/seen     -> mark_seen
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/unseen-count", get(notifications::unseen_count))
        .route("/{id}/seen", post(notifications::mark_seen))
}

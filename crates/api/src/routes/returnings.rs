//! Route definitions for the `/returnings` resource (review queues).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::returnings;
use crate::state::AppState;

/// Routes mounted at `/returnings`.
///
/// ```text
/// GET  /waiting        -> list_waiting_returnings (admin | coach)
/// POST /{id}/accept    -> accept_returning
/// POST /{id}/refuse    -> refuse_returning
/// POST /{id}/transfer  -> transfer_returning
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waiting", get(returnings::list_waiting_returnings))
        .route("/{id}/accept", post(returnings::accept_returning))
        .route("/{id}/refuse", post(returnings::refuse_returning))
        .route("/{id}/transfer", post(returnings::transfer_returning))
}

//! Route definitions for the `/coach_requests` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::coach_requests;
use crate::state::AppState;

/// Routes mounted at `/coach_requests`.
///
/// ```text
/// POST /             -> create_coach_request (builder)
/// GET  /             -> list_own (coach)
/// POST /{id}/accept  -> accept_coach_request
/// POST /{id}/refuse  -> refuse_coach_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(coach_requests::create_coach_request).get(coach_requests::list_own),
        )
        .route("/{id}/accept", post(coach_requests::accept_coach_request))
        .route("/{id}/refuse", post(coach_requests::refuse_coach_request))
}

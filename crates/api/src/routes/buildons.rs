//! Route definitions for the `/buildons` resource (the curriculum).

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::buildons;
use crate::state::AppState;

/// Routes mounted at `/buildons`.
///
/// ```text
/// GET    /            -> list_buildons
/// POST   /sync        -> sync_buildons (admin only)
/// GET    /{id}/steps  -> list_buildon_steps
/// DELETE /{id}        -> delete_buildon (admin only)
/// DELETE /steps/{id}  -> delete_buildon_step (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(buildons::list_buildons))
        .route("/sync", post(buildons::sync_buildons))
        .route("/{id}/steps", get(buildons::list_buildon_steps))
        .route("/{id}", delete(buildons::delete_buildon))
        .route("/steps/{id}", delete(buildons::delete_buildon_step))
}

//! Route definitions for the `/projects` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST /                     -> create_project (builder)
/// PUT  /{id}                 -> update_project
/// POST /{id}/validate_step   -> validate_step (admin | coach)
/// POST /{id}/returnings      -> submit_returning (builder, multipart)
/// GET  /{id}/returnings      -> list_project_returnings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(projects::create_project))
        .route("/{id}", put(projects::update_project))
        .route("/{id}/validate_step", post(projects::validate_step))
        .route(
            "/{id}/returnings",
            post(projects::submit_returning).get(projects::list_project_returnings),
        )
}

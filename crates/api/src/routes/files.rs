//! Route definitions for the `/files` resource (blob storage).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// Routes mounted at `/files`.
///
/// ```text
/// POST /                -> upload_file (admin only, multipart)
/// GET  /{id}            -> get_file
/// GET  /by_name/{name}  -> get_file_by_name
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(files::upload_file))
        .route("/{id}", get(files::get_file))
        .route("/by_name/{name}", get(files::get_file_by_name))
}

//! Route definitions for the `/ntf_referents` resource.
//!
//! All endpoints are admin only.

use axum::routing::get;
use axum::Router;

use crate::handlers::ntf_referents;
use crate::state::AppState;

/// Routes mounted at `/ntf_referents`.
///
/// ```text
/// GET  /      -> list_referents
/// POST /      -> create_referent
/// GET  /{id}  -> get_referent
/// PUT  /{id}  -> update_referent
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(ntf_referents::list_referents).post(ntf_referents::create_referent),
        )
        .route(
            "/{id}",
            get(ntf_referents::get_referent).put(ntf_referents::update_referent),
        )
}

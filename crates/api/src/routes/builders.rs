//! Route definitions for the `/builders` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::builders;
use crate::state::AppState;

/// Routes mounted at `/builders`.
///
/// ```text
/// POST /                      -> register_builder
/// GET  /candidating           -> get_candidating_builders (admin only)
/// GET  /active                -> get_active_builders (admin only)
/// GET  /{id}                  -> get_builder
/// PUT  /{id}                  -> update_builder
/// GET  /{id}/user             -> get_builder_user
/// GET  /{id}/coach            -> get_builder_coach
/// GET  /{id}/ntf_referent     -> get_builder_ntf_referent
/// GET  /{id}/form             -> get_builder_form
/// GET  /{id}/meeting_reports  -> get_builder_meeting_reports
/// GET  /{id}/project          -> get_builder_project
/// GET  /{id}/card             -> get_builder_card
/// POST /{id}/card             -> create_builder_card (admin only)
/// POST /{id}/sign_integration -> sign_integration
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(builders::register_builder))
        .route("/candidating", get(builders::get_candidating_builders))
        .route("/active", get(builders::get_active_builders))
        .route(
            "/{id}",
            get(builders::get_builder).put(builders::update_builder),
        )
        .route("/{id}/user", get(builders::get_builder_user))
        .route("/{id}/coach", get(builders::get_builder_coach))
        .route("/{id}/ntf_referent", get(builders::get_builder_ntf_referent))
        .route("/{id}/form", get(builders::get_builder_form))
        .route(
            "/{id}/meeting_reports",
            get(builders::get_builder_meeting_reports),
        )
        .route("/{id}/project", get(builders::get_builder_project))
        .route(
            "/{id}/card",
            get(builders::get_builder_card).post(builders::create_builder_card),
        )
        .route("/{id}/sign_integration", post(builders::sign_integration))
}

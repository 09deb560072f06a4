//! Route definitions for the `/coachs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{coach_requests, coachs};
use crate::state::AppState;

/// Routes mounted at `/coachs`.
///
/// ```text
/// POST /                      -> register_coach
/// GET  /                      -> list_coachs (admin only)
/// GET  /candidating           -> get_candidating_coachs (admin only)
/// GET  /active                -> get_active_coachs (admin only)
/// GET  /available             -> get_available_coachs
/// GET  /{id}                  -> get_coach
/// PUT  /{id}                  -> update_coach
/// GET  /{id}/user             -> get_coach_user
/// GET  /{id}/builders         -> get_coach_builders
/// GET  /{id}/form             -> get_coach_form
/// GET  /{id}/coach_requests   -> list_for_coach
/// GET  /{id}/card             -> get_coach_card
/// POST /{id}/card             -> create_coach_card (admin only)
/// POST /{id}/sign_integration -> sign_integration
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(coachs::register_coach).get(coachs::list_coachs))
        .route("/candidating", get(coachs::get_candidating_coachs))
        .route("/active", get(coachs::get_active_coachs))
        .route("/available", get(coachs::get_available_coachs))
        .route("/{id}", get(coachs::get_coach).put(coachs::update_coach))
        .route("/{id}/user", get(coachs::get_coach_user))
        .route("/{id}/builders", get(coachs::get_coach_builders))
        .route("/{id}/form", get(coachs::get_coach_form))
        .route("/{id}/coach_requests", get(coach_requests::list_for_coach))
        .route(
            "/{id}/card",
            get(coachs::get_coach_card).post(coachs::create_coach_card),
        )
        .route("/{id}/sign_integration", post(coachs::sign_integration))
}

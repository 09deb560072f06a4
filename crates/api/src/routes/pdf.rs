//! Route definitions for the `/pdf` resource (generated documents).

use axum::routing::post;
use axum::Router;

use crate::handlers::pdf;
use crate::state::AppState;

/// Routes mounted at `/pdf`.
///
/// ```text
/// POST /fiche_integration/{builder_id}  -> generate_fiche_integration (admin only)
/// GET  /fiche_integration/{builder_id}  -> get_fiche_integration
/// POST /attestation_mineur              -> generate_attestation_mineur (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/fiche_integration/{builder_id}",
            post(pdf::generate_fiche_integration).get(pdf::get_fiche_integration),
        )
        .route("/attestation_mineur", post(pdf::generate_attestation_mineur))
}

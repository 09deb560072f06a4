//! Route definitions for the `/meeting_reports` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::meeting_reports;
use crate::state::AppState;

/// Routes mounted at `/meeting_reports`.
///
/// ```text
/// POST / -> create_meeting_report (assigned coach)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(meeting_reports::create_meeting_report))
}

//! Handlers for the `/meeting_reports` resource.
//!
//! After each meeting with one of their builders, the coach files a
//! report. The report date is set by the server; reading reports goes
//! through `GET /builders/{id}/meeting_reports`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use buildup_core::permission::CallerContext;
use buildup_core::validate::{validate_required_text, MAX_TEXT_LENGTH};
use buildup_core::CoreError;
use buildup_db::models::meeting_report::{CreateMeetingReport, MeetingReport};
use buildup_db::repositories::{BuilderRepo, MeetingReportRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::caller::resolve_caller;
use crate::state::AppState;

/// POST /api/v1/meeting_reports
///
/// The assigned coach files a report for a meeting with their builder.
pub async fn create_meeting_report(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateMeetingReport>,
) -> AppResult<(StatusCode, Json<MeetingReport>)> {
    let caller = resolve_caller(&state, &user).await?;
    let CallerContext::Coach { coach_id } = &caller else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only coaches can file meeting reports".into(),
        )));
    };

    validate_required_text("objectif", &input.objectif, MAX_TEXT_LENGTH)?;
    validate_required_text("evolution", &input.evolution, MAX_TEXT_LENGTH)?;

    let builder = BuilderRepo::find_by_id(&state.pool, &input.builder_id)
        .await?
        .ok_or_else(|| CoreError::not_found("builder", input.builder_id.as_str()))?;
    if builder.coach_id.as_deref() != Some(coach_id.as_str()) {
        return Err(AppError::Core(CoreError::Forbidden(
            "This builder is not assigned to you".into(),
        )));
    }

    let report = MeetingReportRepo::create(&state.pool, coach_id, &input).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

//! Handlers for the `/coach_requests` resource.
//!
//! A builder who finished the admin interviews picks a coach from the
//! available listing; that creates a waiting request and makes the
//! coach the builder's tentative coach. The coach then accepts, which
//! moves the builder to the signing step, or refuses, which clears the
//! assignment so the builder can pick someone else. Requests are
//! decided exactly once.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildup_core::permission::CallerContext;
use buildup_core::profile::{
    BUILDER_STEP_ADMIN_MEETING_DONE, BUILDER_STEP_COACH_MEETING, BUILDER_STEP_SIGNING,
    PROFILE_STATUS_VALIDATED,
};
use buildup_core::roles::{ROLE_BUILDER, ROLE_COACH};
use buildup_core::CoreError;
use buildup_db::models::builder::Builder;
use buildup_db::models::coach_request::{CoachRequest, CreateCoachRequest};
use buildup_db::models::user::User;
use buildup_db::repositories::{BuilderRepo, CoachRepo, CoachRequestRepo, UserRepo};
use buildup_events::{Effect, EmailTemplate};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::caller::resolve_caller;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn load_request(state: &AppState, id: &str) -> Result<CoachRequest, AppError> {
    let request = CoachRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("coach_request", id))?;
    Ok(request)
}

async fn load_builder(state: &AppState, id: &str) -> Result<Builder, AppError> {
    let builder = BuilderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("builder", id))?;
    Ok(builder)
}

async fn load_account(state: &AppState, user_id: &str) -> Result<User, AppError> {
    let account = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", user_id))?;
    Ok(account)
}

/// Only the requested coach (or an admin) may answer a request.
async fn ensure_request_coach(
    state: &AppState,
    user: &AuthUser,
    request: &CoachRequest,
) -> Result<(), AppError> {
    let caller = resolve_caller(state, user).await?;
    match &caller {
        CallerContext::Admin => Ok(()),
        CallerContext::Coach { coach_id } if *coach_id == request.coach_id => Ok(()),
        _ => Err(AppError::Core(CoreError::Forbidden(
            "You are not the coach for this request".into(),
        ))),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/coach_requests
///
/// A builder asks a validated coach to accompany them. The coach
/// becomes the builder's tentative coach until the request is decided;
/// a second open request for the same pair is a conflict.
pub async fn create_coach_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCoachRequest>,
) -> AppResult<(StatusCode, Json<CoachRequest>)> {
    let caller = resolve_caller(&state, &user).await?;
    let CallerContext::Builder { builder_id } = &caller else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only builders can request a coach".into(),
        )));
    };

    let coach = CoachRepo::find_by_id(&state.pool, &input.coach_id)
        .await?
        .ok_or_else(|| CoreError::not_found("coach", input.coach_id.as_str()))?;
    if coach.status != PROFILE_STATUS_VALIDATED {
        return Err(AppError::Core(CoreError::Validation(
            "This coach is not available".into(),
        )));
    }

    let builder = load_builder(&state, builder_id).await?;
    let request = CoachRequestRepo::create(&state.pool, &input.coach_id, builder_id).await?;

    BuilderRepo::set_coach(&state.pool, builder_id, Some(&input.coach_id)).await?;
    if builder.step == BUILDER_STEP_ADMIN_MEETING_DONE {
        BuilderRepo::set_step(&state.pool, builder_id, BUILDER_STEP_COACH_MEETING).await?;
    }

    let coach_account = load_account(&state, &coach.user_id).await?;
    let builder_account = load_account(&state, &builder.user_id).await?;
    let builder_name = format!(
        "{} {}",
        builder_account.first_name, builder_account.last_name
    );

    let effects = vec![
        Effect::email(
            coach_account.email.clone(),
            EmailTemplate::CoachRequestReceived,
            vec![
                ("first_name", coach_account.first_name.clone()),
                ("builder_name", builder_name.clone()),
            ],
        ),
        Effect::notify(
            coach.user_id.clone(),
            ROLE_COACH,
            format!("{builder_name} souhaite que tu deviennes son Coach."),
        ),
    ];
    state
        .dispatcher
        .dispatch("coach_requests.create", effects)
        .await;

    Ok((StatusCode::CREATED, Json(request)))
}

/// POST /api/v1/coach_requests/{id}/accept
///
/// The coach accepts the request: the builder keeps the coach and moves
/// to the signing step.
pub async fn accept_coach_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<CoachRequest>> {
    let request = load_request(&state, &id).await?;
    ensure_request_coach(&state, &user, &request).await?;

    let decided = CoachRequestRepo::decide(&state.pool, &id, "accepted")
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "This request has already been decided".into(),
            ))
        })?;

    BuilderRepo::set_coach(&state.pool, &request.builder_id, Some(&request.coach_id)).await?;
    BuilderRepo::set_step(&state.pool, &request.builder_id, BUILDER_STEP_SIGNING).await?;

    let builder = load_builder(&state, &request.builder_id).await?;
    let builder_account = load_account(&state, &builder.user_id).await?;
    let coach = CoachRepo::find_by_id(&state.pool, &request.coach_id)
        .await?
        .ok_or_else(|| CoreError::not_found("coach", request.coach_id.as_str()))?;
    let coach_account = load_account(&state, &coach.user_id).await?;
    let coach_name = format!("{} {}", coach_account.first_name, coach_account.last_name);

    let effects = vec![
        Effect::email(
            builder_account.email.clone(),
            EmailTemplate::CoachRequestAccepted,
            vec![
                ("first_name", builder_account.first_name.clone()),
                ("coach_name", coach_name.clone()),
            ],
        ),
        Effect::notify(
            builder.user_id.clone(),
            ROLE_BUILDER,
            format!("{coach_name} a accepté ta demande de coaching."),
        ),
    ];
    state
        .dispatcher
        .dispatch("coach_requests.accept", effects)
        .await;

    Ok(Json(decided))
}

/// POST /api/v1/coach_requests/{id}/refuse
///
/// The coach refuses the request: the tentative assignment is cleared
/// so the builder can pick another coach.
pub async fn refuse_coach_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<CoachRequest>> {
    let request = load_request(&state, &id).await?;
    ensure_request_coach(&state, &user, &request).await?;

    let decided = CoachRequestRepo::decide(&state.pool, &id, "refused")
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "This request has already been decided".into(),
            ))
        })?;

    BuilderRepo::set_coach(&state.pool, &request.builder_id, None).await?;

    let builder = load_builder(&state, &request.builder_id).await?;
    let builder_account = load_account(&state, &builder.user_id).await?;
    let coach = CoachRepo::find_by_id(&state.pool, &request.coach_id)
        .await?
        .ok_or_else(|| CoreError::not_found("coach", request.coach_id.as_str()))?;
    let coach_account = load_account(&state, &coach.user_id).await?;
    let coach_name = format!("{} {}", coach_account.first_name, coach_account.last_name);

    let effects = vec![
        Effect::email(
            builder_account.email.clone(),
            EmailTemplate::CoachRequestRefused,
            vec![
                ("first_name", builder_account.first_name.clone()),
                ("coach_name", coach_name.clone()),
            ],
        ),
        Effect::notify(
            builder.user_id.clone(),
            ROLE_BUILDER,
            format!("{coach_name} a refusé ta demande de coaching."),
        ),
    ];
    state
        .dispatcher
        .dispatch("coach_requests.refuse", effects)
        .await;

    Ok(Json(decided))
}

/// GET /api/v1/coach_requests
///
/// The waiting requests addressed to the calling coach, oldest first.
pub async fn list_own(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<CoachRequest>>> {
    let caller = resolve_caller(&state, &user).await?;
    let CallerContext::Coach { coach_id } = &caller else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only coaches can list their own requests".into(),
        )));
    };

    let requests = CoachRequestRepo::list_waiting_for_coach(&state.pool, coach_id).await?;
    Ok(Json(requests))
}

/// GET /api/v1/coachs/{id}/coach_requests
///
/// The waiting requests addressed to a coach, oldest first.
pub async fn list_for_coach(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CoachRequest>>> {
    let coach = CoachRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("coach", id.as_str()))?;

    let caller = resolve_caller(&state, &user).await?;
    buildup_core::permission::resolve_coach_access(&caller, &coach.id)?;

    let requests = CoachRequestRepo::list_waiting_for_coach(&state.pool, &coach.id).await?;
    Ok(Json(requests))
}

//! Handlers for the `/returnings` resource: the review side of the
//! curriculum walk.
//!
//! Fresh submissions wait in both queues; an admin can park one for the
//! coach and a coach can escalate one to the admin team. Accepting a
//! pending returning validates the project's current step and advances
//! the cursor; refusing records a reason and lets the builder resubmit.

use axum::extract::{Path, State};
use axum::Json;
use buildup_core::curriculum::{
    RETURNING_STATUS_REFUSED, RETURNING_STATUS_VALIDATED, RETURNING_STATUS_WAITING,
    RETURNING_STATUS_WAITING_ADMIN, RETURNING_STATUS_WAITING_COACH,
};
use buildup_core::permission::{self, CallerContext};
use buildup_core::roles::{ROLE_ADMIN, ROLE_BUILDER};
use buildup_core::validate::{validate_required_text, MAX_TEXT_LENGTH};
use buildup_core::CoreError;
use buildup_db::models::builder::Builder;
use buildup_db::models::project::Project;
use buildup_db::models::returning::{BuildOnReturning, RefuseReturning};
use buildup_db::repositories::{BuildOnRepo, ProjectRepo, ReturningRepo, UserRepo};
use buildup_events::{Effect, EmailTemplate};

use crate::error::{AppError, AppResult};
use crate::handlers::projects::{
    builder_access, current_cursor, load_builder, load_project, step_advanced_effects,
};
use crate::middleware::auth::AuthUser;
use crate::middleware::caller::resolve_caller;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load a returning with its project and builder, and resolve the
/// caller as a reviewer. Returns the reviewer role to record.
async fn load_for_review(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> Result<(BuildOnReturning, Project, Builder, &'static str), AppError> {
    let returning = ReturningRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("returning", id))?;
    let project = load_project(state, &returning.project_id).await?;
    let builder = load_builder(state, &project.builder_id).await?;

    let caller = resolve_caller(state, user).await?;
    let reviewer = permission::resolve_returning_reviewer(&caller, builder_access(&builder))?;
    Ok((returning, project, builder, reviewer))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/returnings/waiting
///
/// The caller's review queue, oldest first. Admins see fresh and
/// admin-parked submissions across all projects; coaches see fresh and
/// coach-parked submissions from their own builders.
pub async fn list_waiting_returnings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<BuildOnReturning>>> {
    let caller = resolve_caller(&state, &user).await?;
    let returnings = match &caller {
        CallerContext::Admin => {
            ReturningRepo::list_pending(
                &state.pool,
                &[RETURNING_STATUS_WAITING, RETURNING_STATUS_WAITING_ADMIN],
            )
            .await?
        }
        CallerContext::Coach { coach_id } => {
            ReturningRepo::list_pending_for_coach(
                &state.pool,
                coach_id,
                &[RETURNING_STATUS_WAITING, RETURNING_STATUS_WAITING_COACH],
            )
            .await?
        }
        CallerContext::Builder { .. } => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Builders cannot review returnings".into(),
            )));
        }
    };
    Ok(Json(returnings))
}

/// POST /api/v1/returnings/{id}/accept
///
/// Validate a pending returning. Only the project's current step can be
/// accepted; the cursor advances exactly once.
pub async fn accept_returning(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<BuildOnReturning>> {
    let (returning, project, builder, reviewer) = load_for_review(&state, &user, &id).await?;

    let cursor = current_cursor(&project)?;
    if returning.build_on_step_id != cursor.build_on_step_id {
        return Err(AppError::Core(CoreError::Conflict(
            "This returning is not for the project's current step".into(),
        )));
    }

    let decided =
        ReturningRepo::decide(&state.pool, &id, RETURNING_STATUS_VALIDATED, reviewer, None)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "This returning has already been decided".into(),
                ))
            })?;

    let index = BuildOnRepo::curriculum_index(&state.pool).await?;
    let next = index.successor(&cursor)?;
    let advanced =
        ProjectRepo::advance_cursor(&state.pool, &project.id, &cursor, next.as_ref()).await?;
    if !advanced {
        return Err(AppError::Core(CoreError::Conflict(
            "The project has already moved past this step".into(),
        )));
    }

    let step_name = BuildOnRepo::find_step_by_id(&state.pool, &cursor.build_on_step_id)
        .await?
        .map(|s| s.name)
        .unwrap_or_default();
    let effects =
        step_advanced_effects(&state, &builder, EmailTemplate::ReturningAccepted, &step_name)
            .await?;
    state.dispatcher.dispatch("returnings.accept", effects).await;

    Ok(Json(decided))
}

/// POST /api/v1/returnings/{id}/refuse
///
/// Refuse a pending returning with a reason. The cursor stays put and
/// the builder may submit again for the same step.
pub async fn refuse_returning(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<RefuseReturning>,
) -> AppResult<Json<BuildOnReturning>> {
    validate_required_text("reason", &input.reason, MAX_TEXT_LENGTH)?;

    let (returning, _project, builder, reviewer) = load_for_review(&state, &user, &id).await?;

    let decided = ReturningRepo::decide(
        &state.pool,
        &id,
        RETURNING_STATUS_REFUSED,
        reviewer,
        Some(&input.reason),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "This returning has already been decided".into(),
        ))
    })?;

    let step_name = BuildOnRepo::find_step_by_id(&state.pool, &returning.build_on_step_id)
        .await?
        .map(|s| s.name)
        .unwrap_or_default();
    let account = UserRepo::find_by_id(&state.pool, &builder.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", builder.user_id.as_str()))?;

    let effects = vec![
        Effect::email(
            account.email.clone(),
            EmailTemplate::ReturningRefused,
            vec![
                ("first_name", account.first_name.clone()),
                ("step_name", step_name.clone()),
                ("reason", input.reason.clone()),
            ],
        ),
        Effect::notify(
            builder.user_id.clone(),
            ROLE_BUILDER,
            format!("Ton livrable pour « {step_name} » a été refusé : {}", input.reason),
        ),
    ];
    state.dispatcher.dispatch("returnings.refuse", effects).await;

    Ok(Json(decided))
}

/// POST /api/v1/returnings/{id}/transfer
///
/// Park a pending returning in the other review queue: an admin hands
/// it to the coach, a coach escalates it to the admin team.
pub async fn transfer_returning(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<BuildOnReturning>> {
    let (_returning, _project, _builder, reviewer) = load_for_review(&state, &user, &id).await?;

    let target = if reviewer == ROLE_ADMIN {
        RETURNING_STATUS_WAITING_COACH
    } else {
        RETURNING_STATUS_WAITING_ADMIN
    };

    let transferred = ReturningRepo::transfer(&state.pool, &id, target)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "This returning has already been decided".into(),
            ))
        })?;
    Ok(Json(transferred))
}

//! Handlers for the `/projects` resource: the builder's project and its
//! walk through the curriculum.
//!
//! A builder owns exactly one project. The project carries the
//! curriculum cursor; returnings are submitted against the cursor's
//! step and reviewed by the coach or the admin team, which moves the
//! cursor forward.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildup_core::curriculum::{self, Cursor};
use buildup_core::permission::{self, BuilderAccess, CallerContext};
use buildup_core::roles::{ROLE_BUILDER, ROLE_COACH};
use buildup_core::validate::{validate_required_text, MAX_NAME_LENGTH, MAX_TEXT_LENGTH};
use buildup_core::CoreError;
use buildup_db::models::builder::Builder;
use buildup_db::models::project::{CreateProject, Project, UpdateProject};
use buildup_db::models::returning::{BuildOnReturning, CreateReturning};
use buildup_db::repositories::{
    BuildOnRepo, BuilderRepo, CoachRepo, FileRepo, ProjectRepo, ReturningRepo, UserRepo,
};
use buildup_events::{Effect, EmailTemplate};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::caller::resolve_caller;
use crate::state::AppState;

/// Content type recorded for returning uploads when the client sends
/// none.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) async fn load_project(state: &AppState, id: &str) -> Result<Project, AppError> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("project", id))?;
    Ok(project)
}

pub(crate) async fn load_builder(state: &AppState, id: &str) -> Result<Builder, AppError> {
    let builder = BuilderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("builder", id))?;
    Ok(builder)
}

pub(crate) fn builder_access(builder: &Builder) -> BuilderAccess<'_> {
    BuilderAccess {
        builder_id: &builder.id,
        coach_id: builder.coach_id.as_deref(),
    }
}

/// The project's cursor, or a conflict when the program is complete.
pub(crate) fn current_cursor(project: &Project) -> Result<Cursor, AppError> {
    match (&project.current_build_on, &project.current_build_on_step) {
        (Some(build_on_id), Some(build_on_step_id)) => Ok(Cursor {
            build_on_id: build_on_id.clone(),
            build_on_step_id: build_on_step_id.clone(),
        }),
        _ => Err(AppError::Core(CoreError::Conflict(
            "The project has completed the program".into(),
        ))),
    }
}

/// Step-advance effects addressed to the project's builder.
pub(crate) async fn step_advanced_effects(
    state: &AppState,
    builder: &Builder,
    template: EmailTemplate,
    step_name: &str,
) -> Result<Vec<Effect>, AppError> {
    let account = UserRepo::find_by_id(&state.pool, &builder.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", builder.user_id.as_str()))?;
    Ok(vec![
        Effect::email(
            account.email.clone(),
            template,
            vec![
                ("first_name", account.first_name.clone()),
                ("step_name", step_name.to_string()),
            ],
        ),
        Effect::notify(
            builder.user_id.clone(),
            ROLE_BUILDER,
            format!("L'étape « {step_name} » a été validée."),
        ),
    ])
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
///
/// A builder submits their project. One project per builder; the
/// curriculum cursor starts at the first step of the first build-on (or
/// stays unset when no curriculum exists yet).
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let caller = resolve_caller(&state, &user).await?;
    match &caller {
        CallerContext::Admin => {}
        CallerContext::Builder { builder_id } if *builder_id == input.builder_id => {}
        CallerContext::Builder { .. } => {
            return Err(AppError::Core(CoreError::Forbidden(
                "You can only create a project for your own profile".into(),
            )));
        }
        CallerContext::Coach { .. } => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Coaches cannot create projects".into(),
            )));
        }
    }

    validate_required_text("name", &input.name, MAX_NAME_LENGTH)?;
    validate_required_text("description", &input.description, MAX_TEXT_LENGTH)?;

    load_builder(&state, &input.builder_id).await?;

    let index = BuildOnRepo::curriculum_index(&state.pool).await?;
    let cursor = index.first_step();
    // The one-project-per-builder constraint surfaces as a conflict.
    let project = ProjectRepo::create(&state.pool, &input, cursor.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/v1/projects/{id}
///
/// Update a project's descriptive fields. Admin or the owner builder.
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    let project = load_project(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    match &caller {
        CallerContext::Admin => {}
        CallerContext::Builder { builder_id } if *builder_id == project.builder_id => {}
        _ => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only admins or the project's builder can update it".into(),
            )));
        }
    }

    if let Some(name) = &input.name {
        validate_required_text("name", name, MAX_NAME_LENGTH)?;
    }
    if let Some(description) = &input.description {
        validate_required_text("description", description, MAX_TEXT_LENGTH)?;
    }

    let updated = ProjectRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("project", id.as_str()))?;
    Ok(Json(updated))
}

/// POST /api/v1/projects/{id}/validate_step
///
/// Advance the cursor past the current step without a returning
/// (out-of-band approval). Admin or the builder's coach.
pub async fn validate_step(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    let project = load_project(&state, &id).await?;
    let builder = load_builder(&state, &project.builder_id).await?;

    let caller = resolve_caller(&state, &user).await?;
    permission::resolve_returning_reviewer(&caller, builder_access(&builder))?;

    let cursor = current_cursor(&project)?;
    let index = BuildOnRepo::curriculum_index(&state.pool).await?;
    let next = index.successor(&cursor)?;

    let advanced = ProjectRepo::advance_cursor(&state.pool, &id, &cursor, next.as_ref()).await?;
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
        step_advanced_effects(&state, &builder, EmailTemplate::StepValidated, &step_name).await?;
    state.dispatcher.dispatch("projects.validate_step", effects).await;

    let updated = load_project(&state, &id).await?;
    Ok(Json(updated))
}

/// POST /api/v1/projects/{id}/returnings
///
/// The builder submits proof of work for the current step as multipart
/// form data: a `comment` text field and, for file steps, a `file`
/// part. The payload must match the step's returning type, and only one
/// submission can be pending per step.
pub async fn submit_returning(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<BuildOnReturning>)> {
    let project = load_project(&state, &id).await?;
    let builder = load_builder(&state, &project.builder_id).await?;

    let caller = resolve_caller(&state, &user).await?;
    permission::resolve_returning_submitter(&caller, builder_access(&builder))?;

    let mut comment: Option<String> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "comment" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                comment = Some(text);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("returning").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, content_type, data.to_vec()));
            }
            _ => {} // ignore unknown fields
        }
    }

    let cursor = current_cursor(&project)?;
    let step = BuildOnRepo::find_step_by_id(&state.pool, &cursor.build_on_step_id)
        .await?
        .ok_or_else(|| CoreError::not_found("build_on_step", cursor.build_on_step_id.as_str()))?;

    curriculum::validate_returning_payload(
        &step.returning_type,
        comment.as_deref(),
        file.is_some(),
    )?;

    let mut stored_name = None;
    let mut stored_id = None;
    if let Some((file_name, content_type, data)) = &file {
        let blob_name = format!("return_{}_{}_{}", project.id, step.id, file_name);
        let info = FileRepo::upsert(&state.pool, &blob_name, content_type, data).await?;
        stored_name = Some(file_name.clone());
        stored_id = Some(info.id);
    }

    let input = CreateReturning {
        project_id: project.id.clone(),
        build_on_step_id: step.id.clone(),
        returning_type: step.returning_type.clone(),
        file_name: stored_name,
        file_id: stored_id,
        comment,
    };
    // A submission already pending for this step surfaces as a conflict.
    let returning = ReturningRepo::create(&state.pool, &input).await?;

    if let Some(coach_id) = &builder.coach_id {
        if let Some(coach) = CoachRepo::find_by_id(&state.pool, coach_id).await? {
            let coach_account = UserRepo::find_by_id(&state.pool, &coach.user_id)
                .await?
                .ok_or_else(|| CoreError::not_found("user", coach.user_id.as_str()))?;
            let builder_account = UserRepo::find_by_id(&state.pool, &builder.user_id)
                .await?
                .ok_or_else(|| CoreError::not_found("user", builder.user_id.as_str()))?;
            let builder_name = format!(
                "{} {}",
                builder_account.first_name, builder_account.last_name
            );

            let effects = vec![
                Effect::email(
                    coach_account.email.clone(),
                    EmailTemplate::ReturningSubmitted,
                    vec![
                        ("first_name", coach_account.first_name.clone()),
                        ("builder_name", builder_name.clone()),
                        ("step_name", step.name.clone()),
                    ],
                ),
                Effect::notify(
                    coach.user_id.clone(),
                    ROLE_COACH,
                    format!("{builder_name} a soumis un livrable pour « {} ».", step.name),
                ),
            ];
            state
                .dispatcher
                .dispatch("projects.submit_returning", effects)
                .await;
        }
    }

    Ok((StatusCode::CREATED, Json(returning)))
}

/// GET /api/v1/projects/{id}/returnings
///
/// A project's returnings, newest first. Admin, the builder's coach, or
/// the builder.
pub async fn list_project_returnings(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<BuildOnReturning>>> {
    let project = load_project(&state, &id).await?;
    let builder = load_builder(&state, &project.builder_id).await?;

    let caller = resolve_caller(&state, &user).await?;
    permission::resolve_builder_access(&caller, builder_access(&builder))?;

    let returnings = ReturningRepo::list_by_project(&state.pool, &id).await?;
    Ok(Json(returnings))
}

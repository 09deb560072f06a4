//! Handlers for the `/builders` resource.
//!
//! A builder profile hangs off a user account and carries the program
//! state: candidature status, program step, assigned coach and referent,
//! card and integration fiche. Admin listings, role-resolved reads and
//! the transition-validated update live here, together with the card
//! and fiche routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use buildup_core::permission::{resolve_builder_access, BuilderAccess, CallerContext};
use buildup_core::profile::{self, ProfileEmail, BUILDER_STEP_ACTIVE, PROFILE_STATUS_CANDIDATING};
use buildup_core::roles::{ROLE_ADMIN, ROLE_BUILDER};
use buildup_core::{validate, CoreError};
use buildup_db::models::builder::{Builder, BuilderWithUser, CreateBuilder, UpdateBuilder};
use buildup_db::models::coach::Coach;
use buildup_db::models::form::FormEntry;
use buildup_db::models::meeting_report::MeetingReport;
use buildup_db::models::ntf_referent::NtfReferent;
use buildup_db::models::project::Project;
use buildup_db::models::stored_file::StoredFileInfo;
use buildup_db::models::user::{User, UserResponse};
use buildup_db::repositories::{
    BuilderRepo, CoachRepo, FileRepo, FormRepo, MeetingReportRepo, NtfReferentRepo, ProjectRepo,
    UserRepo,
};
use buildup_events::{Attachment, Effect, EmailTemplate};
use chrono::{Months, Utc};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::caller::resolve_caller;
use crate::middleware::rbac::RequireAdmin;
use crate::pdf::{DocumentTemplate, FormTemplateFiller, PdfFiller};
use crate::state::AppState;

use super::pdf::{builder_fiche_pdf, card_values, document_response, PDF_CONTENT_TYPE};

/// Card validity when the builder has no recorded program end date.
const CARD_VALIDITY_MONTHS: u32 = 3;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn load_builder(state: &AppState, id: &str) -> Result<Builder, AppError> {
    let builder = BuilderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("builder", id))?;
    Ok(builder)
}

fn builder_access(builder: &Builder) -> BuilderAccess<'_> {
    BuilderAccess {
        builder_id: &builder.id,
        coach_id: builder.coach_id.as_deref(),
    }
}

async fn load_account(state: &AppState, user_id: &str) -> Result<User, AppError> {
    let account = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", user_id))?;
    Ok(account)
}

/// Map transition emails to concrete effects, generating the documents
/// that ride along with them.
async fn transition_effects(
    state: &AppState,
    builder: &Builder,
    account: &User,
    emails: Vec<ProfileEmail>,
) -> Result<Vec<Effect>, AppError> {
    let mut effects = Vec::new();
    for email in emails {
        let substitutions = vec![("first_name", account.first_name.clone())];
        match email {
            ProfileEmail::Preselected => effects.push(Effect::email(
                account.email.clone(),
                EmailTemplate::CandidaturePreselected,
                substitutions,
            )),
            ProfileEmail::AdminMeetingValidated => effects.push(Effect::email(
                account.email.clone(),
                EmailTemplate::MeetingValidated,
                substitutions,
            )),
            ProfileEmail::Accepted => {
                let fiche = builder_fiche_pdf(state, builder, account, None).await?;
                effects.push(Effect::email_with_attachment(
                    account.email.clone(),
                    EmailTemplate::CandidatureAccepted,
                    substitutions,
                    Attachment {
                        filename: "fiche_integration.pdf".to_string(),
                        content_type: PDF_CONTENT_TYPE.to_string(),
                        data: fiche,
                    },
                ));
            }
            ProfileEmail::Welcome => {
                let card = match &builder.builder_card_id {
                    Some(file_id) => FileRepo::find_by_id(&state.pool, file_id).await?,
                    None => None,
                };
                effects.push(match card {
                    Some(file) => Effect::email_with_attachment(
                        account.email.clone(),
                        EmailTemplate::WelcomeActive,
                        substitutions,
                        Attachment {
                            filename: "carte_builder.pdf".to_string(),
                            content_type: file.content_type,
                            data: file.data,
                        },
                    ),
                    None => Effect::email(
                        account.email.clone(),
                        EmailTemplate::WelcomeActive,
                        substitutions,
                    ),
                });
            }
            ProfileEmail::Refused => effects.push(Effect::email(
                account.email.clone(),
                EmailTemplate::CandidatureRefused,
                substitutions,
            )),
        }
    }
    Ok(effects)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/builders
///
/// Submit a builder candidature: the profile row plus the candidature
/// form answers. Builders submit for themselves, admins for anyone.
pub async fn register_builder(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateBuilder>,
) -> AppResult<(StatusCode, Json<Builder>)> {
    if user.role != ROLE_ADMIN && input.user_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only submit your own candidature".into(),
        )));
    }

    let account = load_account(&state, &input.user_id).await?;
    if account.role != ROLE_BUILDER {
        return Err(AppError::Core(CoreError::Validation(
            "Only builder accounts can hold a builder profile".into(),
        )));
    }
    if BuilderRepo::find_by_user_id(&state.pool, &input.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A builder profile already exists for this user".into(),
        )));
    }

    validate::validate_required_text("situation", &input.situation, validate::MAX_NAME_LENGTH)?;
    validate::validate_required_text("description", &input.description, validate::MAX_TEXT_LENGTH)?;

    let builder = BuilderRepo::create(&state.pool, &input).await?;
    if !input.form.is_empty() {
        FormRepo::create(&state.pool, &input.user_id, &input.form).await?;
    }

    let effects = vec![Effect::email(
        account.email.clone(),
        EmailTemplate::CandidatureSubmitted,
        vec![
            ("first_name", account.first_name.clone()),
            ("role", "Builder".to_string()),
        ],
    )];
    state.dispatcher.dispatch("builders.register", effects).await;

    Ok((StatusCode::CREATED, Json(builder)))
}

/// GET /api/v1/builders/candidating
///
/// Builders whose candidature is still under review. Admin only.
pub async fn get_candidating_builders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<BuilderWithUser>>> {
    let builders = BuilderRepo::list_by_status(&state.pool, PROFILE_STATUS_CANDIDATING).await?;
    Ok(Json(builders))
}

/// GET /api/v1/builders/active
///
/// Builders currently going through the program. Admin only.
pub async fn get_active_builders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<BuilderWithUser>>> {
    let builders = BuilderRepo::list_by_step(&state.pool, BUILDER_STEP_ACTIVE).await?;
    Ok(Json(builders))
}

/// GET /api/v1/builders/{id}
///
/// Fetch one builder. Admins see everyone, coaches their assigned
/// builders, builders themselves.
pub async fn get_builder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Builder>> {
    let builder = load_builder(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_builder_access(&caller, builder_access(&builder))?;
    Ok(Json(builder))
}

/// GET /api/v1/builders/{id}/user
///
/// The account behind a builder profile.
pub async fn get_builder_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let builder = load_builder(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_builder_access(&caller, builder_access(&builder))?;

    let account = load_account(&state, &builder.user_id).await?;
    Ok(Json(UserResponse::from(account)))
}

/// GET /api/v1/builders/{id}/coach
///
/// The builder's assigned coach, `null` while none is assigned.
pub async fn get_builder_coach(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Option<Coach>>> {
    let builder = load_builder(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_builder_access(&caller, builder_access(&builder))?;

    let coach = match &builder.coach_id {
        Some(coach_id) => CoachRepo::find_by_id(&state.pool, coach_id).await?,
        None => None,
    };
    Ok(Json(coach))
}

/// GET /api/v1/builders/{id}/ntf_referent
///
/// The New Talents referent following this builder, `null` while none
/// is assigned.
pub async fn get_builder_ntf_referent(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Option<NtfReferent>>> {
    let builder = load_builder(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_builder_access(&caller, builder_access(&builder))?;

    let referent = match &builder.ntf_referent_id {
        Some(referent_id) => NtfReferentRepo::find_by_id(&state.pool, referent_id).await?,
        None => None,
    };
    Ok(Json(referent))
}

/// GET /api/v1/builders/{id}/form
///
/// The candidature form answers, in the order they were submitted.
pub async fn get_builder_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<FormEntry>>> {
    let builder = load_builder(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_builder_access(&caller, builder_access(&builder))?;

    let entries = FormRepo::list_entries_for_user(&state.pool, &builder.user_id).await?;
    Ok(Json(entries))
}

/// GET /api/v1/builders/{id}/meeting_reports
///
/// Coaching meeting reports for this builder, newest first.
pub async fn get_builder_meeting_reports(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<MeetingReport>>> {
    let builder = load_builder(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_builder_access(&caller, builder_access(&builder))?;

    let reports = MeetingReportRepo::list_by_builder(&state.pool, &builder.id).await?;
    Ok(Json(reports))
}

/// GET /api/v1/builders/{id}/project
///
/// The builder's project.
pub async fn get_builder_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    let builder = load_builder(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_builder_access(&caller, builder_access(&builder))?;

    let project = ProjectRepo::find_by_builder_id(&state.pool, &builder.id)
        .await?
        .ok_or_else(|| CoreError::not_found("project", id.as_str()))?;
    Ok(Json(project))
}

/// PUT /api/v1/builders/{id}
///
/// Update a builder. Admins may change every field; status and step
/// changes are validated as transitions and trigger the candidature
/// emails. The builder themselves may only touch the descriptive
/// fields.
pub async fn update_builder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateBuilder>,
) -> AppResult<Json<Builder>> {
    let builder = load_builder(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;

    match &caller {
        CallerContext::Admin => {}
        CallerContext::Builder { builder_id } if *builder_id == builder.id => {
            if input.coach_id.is_some()
                || input.ntf_referent_id.is_some()
                || input.status.is_some()
                || input.step.is_some()
                || input.program_end_date.is_some()
            {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only admins can change the program fields".into(),
                )));
            }
        }
        _ => {
            return Err(AppError::Core(CoreError::Forbidden(
                "You cannot update this builder".into(),
            )));
        }
    }

    if let Some(situation) = &input.situation {
        validate::validate_required_text("situation", situation, validate::MAX_NAME_LENGTH)?;
    }
    if let Some(description) = &input.description {
        validate::validate_required_text("description", description, validate::MAX_TEXT_LENGTH)?;
    }
    if let Some(status) = &input.status {
        profile::validate_profile_status_transition(&builder.status, status)?;
    }
    if let Some(step) = &input.step {
        profile::validate_builder_step_transition(&builder.step, step)?;
    }
    if let Some(coach_id) = &input.coach_id {
        if CoachRepo::find_by_id(&state.pool, coach_id).await?.is_none() {
            return Err(AppError::Core(CoreError::not_found(
                "coach",
                coach_id.as_str(),
            )));
        }
    }
    if let Some(referent_id) = &input.ntf_referent_id {
        if NtfReferentRepo::find_by_id(&state.pool, referent_id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::not_found(
                "ntf_referent",
                referent_id.as_str(),
            )));
        }
    }

    let updated = BuilderRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("builder", id.as_str()))?;

    let emails = profile::builder_transition_emails(
        &builder.status,
        &updated.status,
        &builder.step,
        &updated.step,
    );
    if !emails.is_empty() {
        let account = load_account(&state, &builder.user_id).await?;
        let effects = transition_effects(&state, &updated, &account, emails).await?;
        state.dispatcher.dispatch("builders.update", effects).await;
    }

    Ok(Json(updated))
}

/// GET /api/v1/builders/{id}/card
///
/// Download the builder card.
pub async fn get_builder_card(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let builder = load_builder(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_builder_access(&caller, builder_access(&builder))?;

    let file_id = builder
        .builder_card_id
        .as_deref()
        .ok_or_else(|| CoreError::not_found("builder_card", id.as_str()))?;
    let file = FileRepo::find_by_id(&state.pool, file_id)
        .await?
        .ok_or_else(|| CoreError::not_found("file", file_id))?;
    Ok(document_response(&file.content_type, file.data))
}

/// POST /api/v1/builders/{id}/card
///
/// Generate (or regenerate) the builder card and attach it to the
/// profile. The card is valid until the program end date, or three
/// months from now when none is recorded. Admin only.
pub async fn create_builder_card(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<StoredFileInfo>)> {
    let builder = load_builder(&state, &id).await?;
    let account = load_account(&state, &builder.user_id).await?;

    let validity_date = builder
        .program_end_date
        .unwrap_or_else(|| Utc::now() + Months::new(CARD_VALIDITY_MONTHS));
    let values = card_values(&account, validity_date);
    let bytes = FormTemplateFiller.fill(DocumentTemplate::BuilderCard, &values)?;

    let stored = FileRepo::upsert(
        &state.pool,
        &format!("builder_card_{id}"),
        PDF_CONTENT_TYPE,
        &bytes,
    )
    .await?;
    BuilderRepo::set_card(&state.pool, &id, &stored.id).await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// POST /api/v1/builders/{id}/sign_integration
///
/// The builder signs their integration fiche from the application. The
/// dated fiche replaces the stored copy and the signature is recorded
/// once; signing twice is a conflict.
pub async fn sign_integration(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<StoredFileInfo>> {
    let builder = load_builder(&state, &id).await?;
    if builder.user_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the builder can sign their own fiche".into(),
        )));
    }

    if !BuilderRepo::mark_fiche_signed(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "The integration fiche is already signed".into(),
        )));
    }

    let account = load_account(&state, &builder.user_id).await?;
    let bytes = builder_fiche_pdf(&state, &builder, &account, Some(Utc::now())).await?;
    let stored = FileRepo::upsert(
        &state.pool,
        &format!("fiche_integration_{id}"),
        PDF_CONTENT_TYPE,
        &bytes,
    )
    .await?;

    let effects = vec![Effect::notify(
        builder.user_id.clone(),
        ROLE_BUILDER,
        "Ta fiche d'intégration signée a bien été reçue.",
    )];
    state
        .dispatcher
        .dispatch("builders.sign_integration", effects)
        .await;

    Ok(Json(stored))
}

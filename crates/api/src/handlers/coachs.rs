//! Handlers for the `/coachs` resource.
//!
//! Mirrors the builder side where the program is symmetric (candidature,
//! listings, transition-validated update, card, integration fiche) and
//! adds the available-coach listing builders browse when choosing their
//! coach.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use buildup_core::permission::{resolve_coach_access, CallerContext};
use buildup_core::profile::{
    self, ProfileEmail, PROFILE_STATUS_CANDIDATING, PROFILE_STATUS_VALIDATED,
};
use buildup_core::roles::{ROLE_ADMIN, ROLE_COACH};
use buildup_core::{validate, CoreError};
use buildup_db::models::builder::BuilderWithUser;
use buildup_db::models::coach::{
    AvailableCoach, Coach, CoachWithUser, CreateCoach, QuestionAnswer, UpdateCoach,
};
use buildup_db::models::form::FormEntry;
use buildup_db::models::stored_file::StoredFileInfo;
use buildup_db::models::user::{User, UserResponse};
use buildup_db::repositories::{BuilderRepo, CoachRepo, FileRepo, FormRepo, UserRepo};
use buildup_events::{Attachment, Effect, EmailTemplate};
use chrono::{Months, Utc};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::caller::resolve_caller;
use crate::middleware::rbac::RequireAdmin;
use crate::pdf::{DocumentTemplate, FormTemplateFiller, PdfFiller, MISSING_ANSWER};
use crate::state::AppState;

use super::pdf::{card_values, coach_fiche_pdf, document_response, PDF_CONTENT_TYPE};

/// Card validity, counted from the generation date.
const CARD_VALIDITY_MONTHS: u32 = 3;

/// Candidature question whose answer becomes the `competences` field of
/// the available-coach listing.
const QUESTION_COMPETENCES: &str = "Quelles sont vos compétences clés ?";

/// Interview questions surfaced on the available-coach listing, with
/// the answers the coach gave during candidature.
const AVAILABLE_COACH_QUESTIONS: [&str; 7] = [
    "Comment définis-tu le rôle de Coach ?",
    "Pourquoi souhaites-tu devenir Coach ?",
    "Qu’est-ce qui t'incite à proposer ton accompagnement ?",
    "Combien d’heures par semaine peux-tu accorder à un Builder ?",
    "Es-tu prêt à faire preuve de patience, d’écoute et de bienveillance à l’égard des Builders ?",
    "Quel serait le Builder idéal pour toi ?",
    "C'est ton moment. Dis au Builder pourquoi il doit te choisir toi et pas un autre Coach.",
];

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn load_coach(state: &AppState, id: &str) -> Result<Coach, AppError> {
    let coach = CoachRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("coach", id))?;
    Ok(coach)
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
    coach: &Coach,
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
                let fiche = coach_fiche_pdf(state, coach, account, None).await?;
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
                let card = match &coach.coach_card_id {
                    Some(file_id) => FileRepo::find_by_id(&state.pool, file_id).await?,
                    None => None,
                };
                effects.push(match card {
                    Some(file) => Effect::email_with_attachment(
                        account.email.clone(),
                        EmailTemplate::WelcomeActive,
                        substitutions,
                        Attachment {
                            filename: "carte_coach.pdf".to_string(),
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

/// POST /api/v1/coachs
///
/// Submit a coach candidature: the profile row plus the candidature
/// form answers. Coaches submit for themselves, admins for anyone.
pub async fn register_coach(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCoach>,
) -> AppResult<(StatusCode, Json<Coach>)> {
    if user.role != ROLE_ADMIN && input.user_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only submit your own candidature".into(),
        )));
    }

    let account = load_account(&state, &input.user_id).await?;
    if account.role != ROLE_COACH {
        return Err(AppError::Core(CoreError::Validation(
            "Only coach accounts can hold a coach profile".into(),
        )));
    }
    if CoachRepo::find_by_user_id(&state.pool, &input.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A coach profile already exists for this user".into(),
        )));
    }

    validate::validate_required_text("situation", &input.situation, validate::MAX_NAME_LENGTH)?;
    validate::validate_required_text("description", &input.description, validate::MAX_TEXT_LENGTH)?;

    let coach = CoachRepo::create(&state.pool, &input).await?;
    if !input.form.is_empty() {
        FormRepo::create(&state.pool, &input.user_id, &input.form).await?;
    }

    let effects = vec![Effect::email(
        account.email.clone(),
        EmailTemplate::CandidatureSubmitted,
        vec![
            ("first_name", account.first_name.clone()),
            ("role", "Coach".to_string()),
        ],
    )];
    state.dispatcher.dispatch("coachs.register", effects).await;

    Ok((StatusCode::CREATED, Json(coach)))
}

/// GET /api/v1/coachs
///
/// Every coach profile, oldest candidature first. Admin only.
pub async fn list_coachs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<Coach>>> {
    let coachs = CoachRepo::list(&state.pool).await?;
    Ok(Json(coachs))
}

/// GET /api/v1/coachs/candidating
///
/// Coaches whose candidature is still under review. Admin only.
pub async fn get_candidating_coachs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<CoachWithUser>>> {
    let coachs = CoachRepo::list_by_status(&state.pool, PROFILE_STATUS_CANDIDATING).await?;
    Ok(Json(coachs))
}

/// GET /api/v1/coachs/active
///
/// Coaches currently accompanying builders. Admin only.
pub async fn get_active_coachs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<CoachWithUser>>> {
    let coachs = CoachRepo::list_by_step(&state.pool, profile::COACH_STEP_ACTIVE).await?;
    Ok(Json(coachs))
}

/// GET /api/v1/coachs/available
///
/// Validated coaches presented to builders choosing one, each with
/// their competences and interview answers. Any authenticated user.
pub async fn get_available_coachs(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<AvailableCoach>>> {
    let coachs = CoachRepo::list_by_status(&state.pool, PROFILE_STATUS_VALIDATED).await?;

    let mut available = Vec::with_capacity(coachs.len());
    for coach in coachs {
        let competences =
            FormRepo::answer_for_question(&state.pool, &coach.user_id, QUESTION_COMPETENCES)
                .await?
                .unwrap_or_else(|| MISSING_ANSWER.to_string());

        let mut answers = Vec::with_capacity(AVAILABLE_COACH_QUESTIONS.len());
        for question in AVAILABLE_COACH_QUESTIONS {
            let answer = FormRepo::answer_for_question(&state.pool, &coach.user_id, question)
                .await?
                .unwrap_or_else(|| MISSING_ANSWER.to_string());
            answers.push(QuestionAnswer {
                question: question.to_string(),
                answer,
            });
        }

        available.push(AvailableCoach {
            id: coach.id,
            user_id: coach.user_id,
            first_name: coach.first_name,
            last_name: coach.last_name,
            email: coach.email,
            discord_tag: coach.discord_tag,
            situation: coach.situation,
            description: coach.description,
            competences,
            answers,
        });
    }

    Ok(Json(available))
}

/// GET /api/v1/coachs/{id}
///
/// Fetch one coach. Admins see everyone, coaches themselves.
pub async fn get_coach(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Coach>> {
    let coach = load_coach(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_coach_access(&caller, &coach.id)?;
    Ok(Json(coach))
}

/// GET /api/v1/coachs/{id}/user
///
/// The account behind a coach profile.
pub async fn get_coach_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let coach = load_coach(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_coach_access(&caller, &coach.id)?;

    let account = load_account(&state, &coach.user_id).await?;
    Ok(Json(UserResponse::from(account)))
}

/// GET /api/v1/coachs/{id}/builders
///
/// The builders assigned to this coach.
pub async fn get_coach_builders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<BuilderWithUser>>> {
    let coach = load_coach(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_coach_access(&caller, &coach.id)?;

    let builders = BuilderRepo::list_by_coach(&state.pool, &coach.id).await?;
    Ok(Json(builders))
}

/// GET /api/v1/coachs/{id}/form
///
/// The candidature form answers, in the order they were submitted.
pub async fn get_coach_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<FormEntry>>> {
    let coach = load_coach(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_coach_access(&caller, &coach.id)?;

    let entries = FormRepo::list_entries_for_user(&state.pool, &coach.user_id).await?;
    Ok(Json(entries))
}

/// PUT /api/v1/coachs/{id}
///
/// Update a coach. Admins may change every field; status and step
/// changes are validated as transitions and trigger the candidature
/// emails. The coach themselves may only touch the descriptive fields.
pub async fn update_coach(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateCoach>,
) -> AppResult<Json<Coach>> {
    let coach = load_coach(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;

    match &caller {
        CallerContext::Admin => {}
        CallerContext::Coach { coach_id } if *coach_id == coach.id => {
            if input.status.is_some() || input.step.is_some() {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only admins can change the program fields".into(),
                )));
            }
        }
        _ => {
            return Err(AppError::Core(CoreError::Forbidden(
                "You cannot update this coach".into(),
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
        profile::validate_profile_status_transition(&coach.status, status)?;
    }
    if let Some(step) = &input.step {
        profile::validate_coach_step_transition(&coach.step, step)?;
    }

    let updated = CoachRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("coach", id.as_str()))?;

    let emails = profile::coach_transition_emails(
        &coach.status,
        &updated.status,
        &coach.step,
        &updated.step,
    );
    if !emails.is_empty() {
        let account = load_account(&state, &coach.user_id).await?;
        let effects = transition_effects(&state, &updated, &account, emails).await?;
        state.dispatcher.dispatch("coachs.update", effects).await;
    }

    Ok(Json(updated))
}

/// GET /api/v1/coachs/{id}/card
///
/// Download the coach card.
pub async fn get_coach_card(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let coach = load_coach(&state, &id).await?;
    let caller = resolve_caller(&state, &user).await?;
    resolve_coach_access(&caller, &coach.id)?;

    let file_id = coach
        .coach_card_id
        .as_deref()
        .ok_or_else(|| CoreError::not_found("coach_card", id.as_str()))?;
    let file = FileRepo::find_by_id(&state.pool, file_id)
        .await?
        .ok_or_else(|| CoreError::not_found("file", file_id))?;
    Ok(document_response(&file.content_type, file.data))
}

/// POST /api/v1/coachs/{id}/card
///
/// Generate (or regenerate) the coach card and attach it to the
/// profile. Valid three months from generation. Admin only.
pub async fn create_coach_card(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<StoredFileInfo>)> {
    let coach = load_coach(&state, &id).await?;
    let account = load_account(&state, &coach.user_id).await?;

    let validity_date = Utc::now() + Months::new(CARD_VALIDITY_MONTHS);
    let values = card_values(&account, validity_date);
    let bytes = FormTemplateFiller.fill(DocumentTemplate::CoachCard, &values)?;

    let stored = FileRepo::upsert(
        &state.pool,
        &format!("coach_card_{id}"),
        PDF_CONTENT_TYPE,
        &bytes,
    )
    .await?;
    CoachRepo::set_card(&state.pool, &id, &stored.id).await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// POST /api/v1/coachs/{id}/sign_integration
///
/// The coach signs their integration fiche from the application. The
/// dated fiche replaces the stored copy and the signature is recorded
/// once; signing twice is a conflict.
pub async fn sign_integration(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<StoredFileInfo>> {
    let coach = load_coach(&state, &id).await?;
    if coach.user_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the coach can sign their own fiche".into(),
        )));
    }

    if !CoachRepo::mark_fiche_signed(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "The integration fiche is already signed".into(),
        )));
    }

    let account = load_account(&state, &coach.user_id).await?;
    let bytes = coach_fiche_pdf(&state, &coach, &account, Some(Utc::now())).await?;
    let stored = FileRepo::upsert(
        &state.pool,
        &format!("fiche_integration_{id}"),
        PDF_CONTENT_TYPE,
        &bytes,
    )
    .await?;

    let effects = vec![Effect::notify(
        coach.user_id.clone(),
        ROLE_COACH,
        "Ta fiche d'intégration signée a bien été reçue.",
    )];
    state
        .dispatcher
        .dispatch("coachs.sign_integration", effects)
        .await;

    Ok(Json(stored))
}

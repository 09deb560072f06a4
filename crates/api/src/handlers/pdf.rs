//! Handlers for the `/pdf` resource, plus the document generators
//! shared with the builder and coach routes.
//!
//! Integration fiches are assembled from three sources: the account row
//! (identity), the profile row (situation) and the candidature form
//! (everything the user typed during registration). Contact details
//! live in the form rather than on the account, so they are looked up
//! by question text and fall back to the filler's default when the
//! candidature never answered them.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use buildup_core::permission::{resolve_builder_access, BuilderAccess};
use buildup_core::types::Timestamp;
use buildup_core::CoreError;
use buildup_db::models::builder::Builder;
use buildup_db::models::coach::Coach;
use buildup_db::models::stored_file::StoredFileInfo;
use buildup_db::models::user::User;
use buildup_db::repositories::{BuilderRepo, FileRepo, FormRepo, ProjectRepo, UserRepo};
use buildup_events::{Attachment, Effect, EmailTemplate};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::caller::resolve_caller;
use crate::middleware::rbac::RequireAdmin;
use crate::pdf::{DocumentTemplate, FormTemplateFiller, PdfFiller};
use crate::state::AppState;

/// Date rendering used on every generated document.
pub(crate) const DOCUMENT_DATE_FORMAT: &str = "%d/%m/%Y";

/// MIME type of generated documents.
pub(crate) const PDF_CONTENT_TYPE: &str = "application/pdf";

// Candidature form questions mined for the integration fiches.
const QUESTION_PHONE: &str = "Quel est ton numéro de téléphone ?";
const QUESTION_ADDRESS: &str = "Quelle est ton adresse postale ?";
const QUESTION_SCHOOL: &str = "Dans quelle école ou formation es-tu ?";
const QUESTION_BUILDER_EXPECTATIONS: &str =
    "Pourquoi souhaitez-vous intégrer le programme Build Up ?";
const QUESTION_BUILDER_OBJECTIVES: &str =
    "Quels objectifs souhaitez-vous atteindre au bout des 3 mois de programme ?";
const QUESTION_COACH_KEYWORDS: &str = "Quelles sont les mots clés qui vous définissent ?";
const QUESTION_COACH_EXPERIENCES: &str = "Quels sont vos expériences ?";
const QUESTION_COACH_IDEAL_BUILDER: &str = "Quel serait le Builder idéal pour vous ?";
const QUESTION_COACH_OBJECTIVES: &str =
    "Quels objectifs souhaitez-vous que votre Builder atteignent au bout des 3 mois ?";

// ---------------------------------------------------------------------------
// Document generators
// ---------------------------------------------------------------------------

/// Append a form answer when the user gave one. Missing answers keep
/// the filler's default.
async fn push_form_answer(
    state: &AppState,
    values: &mut Vec<(&'static str, String)>,
    key: &'static str,
    user_id: &str,
    question: &str,
) -> Result<(), AppError> {
    if let Some(answer) = FormRepo::answer_for_question(&state.pool, user_id, question).await? {
        values.push((key, answer));
    }
    Ok(())
}

/// Render the integration fiche for a builder. `sign_date` is set when
/// the builder signs from the application, empty on the copy sent out
/// for signature.
pub(crate) async fn builder_fiche_pdf(
    state: &AppState,
    builder: &Builder,
    user: &User,
    sign_date: Option<Timestamp>,
) -> Result<Vec<u8>, AppError> {
    let mut values = vec![
        ("first_name", user.first_name.clone()),
        ("last_name", user.last_name.clone()),
        (
            "birthdate",
            user.birthdate.format(DOCUMENT_DATE_FORMAT).to_string(),
        ),
        ("email", user.email.clone()),
        ("discord", user.discord_tag.clone()),
        ("situation", builder.situation.clone()),
        ("sign_place", String::new()),
        (
            "sign_date",
            sign_date
                .map(|date| date.format(DOCUMENT_DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ),
    ];

    push_form_answer(state, &mut values, "phone", &user.id, QUESTION_PHONE).await?;
    push_form_answer(state, &mut values, "address", &user.id, QUESTION_ADDRESS).await?;
    push_form_answer(state, &mut values, "school", &user.id, QUESTION_SCHOOL).await?;
    push_form_answer(
        state,
        &mut values,
        "expectations",
        &user.id,
        QUESTION_BUILDER_EXPECTATIONS,
    )
    .await?;
    push_form_answer(
        state,
        &mut values,
        "objectives",
        &user.id,
        QUESTION_BUILDER_OBJECTIVES,
    )
    .await?;

    if let Some(project) = ProjectRepo::find_by_builder_id(&state.pool, &builder.id).await? {
        values.push(("project_name", project.name));
        values.push(("project_domains", project.keywords));
        values.push((
            "project_launch_date",
            project.launch_date.format(DOCUMENT_DATE_FORMAT).to_string(),
        ));
        values.push(("project_description", project.description));
        values.push(("project_team", project.team));
    }

    let bytes = FormTemplateFiller.fill(DocumentTemplate::FicheIntegrationBuilder, &values)?;
    Ok(bytes)
}

/// Render the integration fiche for a coach.
pub(crate) async fn coach_fiche_pdf(
    state: &AppState,
    coach: &Coach,
    user: &User,
    sign_date: Option<Timestamp>,
) -> Result<Vec<u8>, AppError> {
    let mut values = vec![
        ("first_name", user.first_name.clone()),
        ("last_name", user.last_name.clone()),
        (
            "birthdate",
            user.birthdate.format(DOCUMENT_DATE_FORMAT).to_string(),
        ),
        ("email", user.email.clone()),
        ("discord", user.discord_tag.clone()),
        ("situation", coach.situation.clone()),
        ("sign_place", String::new()),
        (
            "sign_date",
            sign_date
                .map(|date| date.format(DOCUMENT_DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ),
    ];

    push_form_answer(state, &mut values, "phone", &user.id, QUESTION_PHONE).await?;
    push_form_answer(state, &mut values, "address", &user.id, QUESTION_ADDRESS).await?;
    push_form_answer(
        state,
        &mut values,
        "keywords",
        &user.id,
        QUESTION_COACH_KEYWORDS,
    )
    .await?;
    push_form_answer(
        state,
        &mut values,
        "experiences",
        &user.id,
        QUESTION_COACH_EXPERIENCES,
    )
    .await?;
    push_form_answer(
        state,
        &mut values,
        "ideal_builder",
        &user.id,
        QUESTION_COACH_IDEAL_BUILDER,
    )
    .await?;
    push_form_answer(
        state,
        &mut values,
        "objectives",
        &user.id,
        QUESTION_COACH_OBJECTIVES,
    )
    .await?;

    let bytes = FormTemplateFiller.fill(DocumentTemplate::FicheIntegrationCoach, &values)?;
    Ok(bytes)
}

/// Values printed on builder and coach cards.
pub(crate) fn card_values(user: &User, validity_date: Timestamp) -> Vec<(&'static str, String)> {
    vec![
        ("first_name", user.first_name.clone()),
        ("last_name", user.last_name.clone()),
        (
            "birthdate",
            user.birthdate.format(DOCUMENT_DATE_FORMAT).to_string(),
        ),
        (
            "validity_date",
            validity_date.format(DOCUMENT_DATE_FORMAT).to_string(),
        ),
    ]
}

/// Raw document response with the stored content type.
pub(crate) fn document_response(content_type: &str, data: Vec<u8>) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .body(Body::from(data))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /pdf/attestation_mineur`. Free-form strings
/// filled straight into the document.
#[derive(Debug, Deserialize)]
pub struct AttestationRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub email: String,
    pub phone: String,
    pub made_at: String,
    pub made_date: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/pdf/fiche_integration/{builderId}
///
/// Generate a builder's integration fiche, store it and email it to the
/// builder for signature. Admin only.
pub async fn generate_fiche_integration(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(builder_id): Path<String>,
) -> AppResult<Json<StoredFileInfo>> {
    let builder = BuilderRepo::find_by_id(&state.pool, &builder_id)
        .await?
        .ok_or_else(|| CoreError::not_found("builder", builder_id.as_str()))?;
    let user = UserRepo::find_by_id(&state.pool, &builder.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", builder.user_id.as_str()))?;

    let bytes = builder_fiche_pdf(&state, &builder, &user, None).await?;
    let stored = FileRepo::upsert(
        &state.pool,
        &format!("fiche_integration_{builder_id}"),
        PDF_CONTENT_TYPE,
        &bytes,
    )
    .await?;

    let effects = vec![Effect::email_with_attachment(
        user.email.clone(),
        EmailTemplate::FicheIntegration,
        vec![("first_name", user.first_name.clone())],
        Attachment {
            filename: "fiche_integration.pdf".to_string(),
            content_type: PDF_CONTENT_TYPE.to_string(),
            data: bytes,
        },
    )];
    state
        .dispatcher
        .dispatch("pdf.fiche_integration", effects)
        .await;

    Ok(Json(stored))
}

/// GET /api/v1/pdf/fiche_integration/{builderId}
///
/// Download the stored integration fiche. Admins, the assigned coach
/// and the builder themselves.
pub async fn get_fiche_integration(
    State(state): State<AppState>,
    user: AuthUser,
    Path(builder_id): Path<String>,
) -> AppResult<Response> {
    let builder = BuilderRepo::find_by_id(&state.pool, &builder_id)
        .await?
        .ok_or_else(|| CoreError::not_found("builder", builder_id.as_str()))?;

    let caller = resolve_caller(&state, &user).await?;
    resolve_builder_access(
        &caller,
        BuilderAccess {
            builder_id: &builder.id,
            coach_id: builder.coach_id.as_deref(),
        },
    )?;

    let file = FileRepo::find_by_name(&state.pool, &format!("fiche_integration_{builder_id}"))
        .await?
        .ok_or_else(|| CoreError::not_found("fiche_integration", builder_id.as_str()))?;
    Ok(document_response(&file.content_type, file.data))
}

/// POST /api/v1/pdf/attestation_mineur
///
/// Render the parental authorization for minor candidates from posted
/// values. Nothing is stored; the document is used before any account
/// exists, so the route is public.
pub async fn generate_attestation_mineur(
    Json(input): Json<AttestationRequest>,
) -> AppResult<Response> {
    let values = vec![
        ("name", input.name),
        ("address", input.address),
        ("city", input.city),
        ("postal_code", input.postal_code),
        ("email", input.email),
        ("phone", input.phone),
        ("made_at", input.made_at),
        ("made_date", input.made_date),
    ];

    let bytes = FormTemplateFiller.fill(DocumentTemplate::AttestationMineure, &values)?;
    Ok(document_response(PDF_CONTENT_TYPE, bytes))
}

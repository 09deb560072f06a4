//! Handlers for the `/ntf_referents` resource.
//!
//! NTF referents are program-side contacts (legal, accounting, pitch)
//! that admins assign to builders. Managed by admins only; builders see
//! their own referent through `GET /builders/{id}/ntf_referent`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildup_core::validate::{validate_email, validate_required_text, MAX_NAME_LENGTH};
use buildup_core::CoreError;
use buildup_db::models::ntf_referent::{CreateNtfReferent, NtfReferent, UpdateNtfReferent};
use buildup_db::repositories::NtfReferentRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/ntf_referents
///
/// All referents, alphabetically by last name.
pub async fn list_referents(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<NtfReferent>>> {
    let referents = NtfReferentRepo::list(&state.pool).await?;
    Ok(Json(referents))
}

/// GET /api/v1/ntf_referents/{id}
pub async fn get_referent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<NtfReferent>> {
    let referent = NtfReferentRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("ntf_referent", id.as_str()))?;
    Ok(Json(referent))
}

/// POST /api/v1/ntf_referents
pub async fn create_referent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateNtfReferent>,
) -> AppResult<(StatusCode, Json<NtfReferent>)> {
    validate_required_text("first_name", &input.first_name, MAX_NAME_LENGTH)?;
    validate_required_text("last_name", &input.last_name, MAX_NAME_LENGTH)?;
    validate_email(&input.email)?;
    if let Some(competence) = &input.competence {
        validate_required_text("competence", competence, MAX_NAME_LENGTH)?;
    }

    let referent = NtfReferentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(referent)))
}

/// PUT /api/v1/ntf_referents/{id}
pub async fn update_referent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<UpdateNtfReferent>,
) -> AppResult<Json<NtfReferent>> {
    if let Some(first_name) = &input.first_name {
        validate_required_text("first_name", first_name, MAX_NAME_LENGTH)?;
    }
    if let Some(last_name) = &input.last_name {
        validate_required_text("last_name", last_name, MAX_NAME_LENGTH)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }

    let referent = NtfReferentRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("ntf_referent", id.as_str()))?;
    Ok(Json(referent))
}

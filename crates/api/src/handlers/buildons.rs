//! Handlers for the `/buildons` resource (the curriculum).
//!
//! The curriculum is managed as a whole: the admin frontend submits the
//! full ordered list of build-ons with their steps, and the position of
//! each element in the submitted list becomes its index. Builders read
//! the curriculum to know what the current step asks of them.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildup_core::curriculum::validate_returning_type;
use buildup_core::CoreError;
use buildup_db::models::build_on::{BuildOn, BuildOnStep, BuildOnSync, BuildOnWithSteps};
use buildup_db::repositories::{BuildOnRepo, FileRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Content type recorded for curriculum illustrations.
const IMAGE_CONTENT_TYPE: &str = "image/png";

/// GET /api/v1/buildons
///
/// The build-ons in curriculum order.
pub async fn list_buildons(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<BuildOn>>> {
    let build_ons = BuildOnRepo::list(&state.pool).await?;
    Ok(Json(build_ons))
}

/// GET /api/v1/buildons/{id}/steps
///
/// The steps of one build-on in curriculum order.
pub async fn list_buildon_steps(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<BuildOnStep>>> {
    BuildOnRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("build_on", id.as_str()))?;
    let steps = BuildOnRepo::list_steps(&state.pool, &id).await?;
    Ok(Json(steps))
}

/// POST /api/v1/buildons/sync
///
/// Replace the curriculum definition with the submitted one. Element N
/// of the list receives index N; an entry with an id updates that row,
/// an entry without one inserts a new row. Rows absent from the list
/// are left alone. Returns the synced curriculum.
pub async fn sync_buildons(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<Vec<BuildOnSync>>,
) -> AppResult<Json<Vec<BuildOnWithSteps>>> {
    for entry in &input {
        for step_entry in &entry.steps {
            validate_returning_type(&step_entry.returning_type)?;
        }
    }

    let mut synced = Vec::with_capacity(input.len());

    for (position, entry) in input.iter().enumerate() {
        let index = position as i32;
        let mut build_on = match &entry.id {
            Some(id) => BuildOnRepo::update(&state.pool, id, index, &entry.name, &entry.description)
                .await?
                .ok_or_else(|| CoreError::not_found("build_on", id.as_str()))?,
            None => BuildOnRepo::insert(&state.pool, index, &entry.name, &entry.description).await?,
        };

        if let Some(image) = &entry.image {
            if !image.is_empty() {
                let name = format!("buildon_{}", build_on.id);
                let stored = FileRepo::upsert(&state.pool, &name, IMAGE_CONTENT_TYPE, image).await?;
                BuildOnRepo::set_image(&state.pool, &build_on.id, &stored.id).await?;
                build_on.image_id = Some(stored.id);
            }
        }

        let mut steps = Vec::with_capacity(entry.steps.len());
        for (step_position, step_entry) in entry.steps.iter().enumerate() {
            let step_index = step_position as i32;
            let mut step = match &step_entry.id {
                Some(id) => BuildOnRepo::update_step(
                    &state.pool,
                    id,
                    step_index,
                    &step_entry.name,
                    &step_entry.description,
                    &step_entry.returning_type,
                    &step_entry.returning_description,
                    step_entry.returning_link.as_deref(),
                )
                .await?
                .ok_or_else(|| CoreError::not_found("build_on_step", id.as_str()))?,
                None => {
                    BuildOnRepo::insert_step(
                        &state.pool,
                        &build_on.id,
                        step_index,
                        &step_entry.name,
                        &step_entry.description,
                        &step_entry.returning_type,
                        &step_entry.returning_description,
                        step_entry.returning_link.as_deref(),
                    )
                    .await?
                }
            };

            if let Some(image) = &step_entry.image {
                if !image.is_empty() {
                    let name = format!("buildonstep_{}", step.id);
                    let stored =
                        FileRepo::upsert(&state.pool, &name, IMAGE_CONTENT_TYPE, image).await?;
                    BuildOnRepo::set_step_image(&state.pool, &step.id, &stored.id).await?;
                    step.image_id = Some(stored.id);
                }
            }

            steps.push(step);
        }

        synced.push(BuildOnWithSteps { build_on, steps });
    }

    Ok(Json(synced))
}

/// DELETE /api/v1/buildons/{id}
///
/// Remove a build-on and its steps from the curriculum.
pub async fn delete_buildon(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let deleted = BuildOnRepo::delete(&state.pool, &id).await?;
    if !deleted {
        return Err(CoreError::not_found("build_on", id.as_str()).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/buildons/steps/{id}
///
/// Remove a single step from the curriculum.
pub async fn delete_buildon_step(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let deleted = BuildOnRepo::delete_step(&state.pool, &id).await?;
    if !deleted {
        return Err(CoreError::not_found("build_on_step", id.as_str()).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

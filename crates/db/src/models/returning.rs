//! Build-on returning (submitted proof) entity model and DTOs.

use buildup_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `build_on_returnings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BuildOnReturning {
    pub id: EntityId,
    pub project_id: EntityId,
    pub build_on_step_id: EntityId,
    pub returning_type: String,
    pub status: String,
    pub file_name: Option<String>,
    pub file_id: Option<EntityId>,
    pub comment: Option<String>,
    pub refusing_reason: Option<String>,
    /// Which side of the review decided ("admin" or "coach"), set when
    /// the returning is validated or refused.
    pub reviewed_by: Option<String>,
    pub created_at: Timestamp,
}

/// Insert payload for a submission. The file, when the step requires
/// one, has already been stored and its blob id resolved.
#[derive(Debug, Clone)]
pub struct CreateReturning {
    pub project_id: EntityId,
    pub build_on_step_id: EntityId,
    pub returning_type: String,
    pub file_name: Option<String>,
    pub file_id: Option<EntityId>,
    pub comment: Option<String>,
}

/// Body of the refuse operation.
#[derive(Debug, Deserialize)]
pub struct RefuseReturning {
    pub reason: String,
}

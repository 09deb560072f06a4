//! Coach request entity model and DTO.

use buildup_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `coach_requests` table: a builder asking to be
/// matched with a coach.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoachRequest {
    pub id: EntityId,
    pub coach_id: EntityId,
    pub builder_id: EntityId,
    pub status: String,
    pub date: Timestamp,
}

/// DTO for creating a coach request.
#[derive(Debug, Deserialize)]
pub struct CreateCoachRequest {
    pub coach_id: EntityId,
}

//! Meeting report entity model and DTO.

use buildup_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `meeting_reports` table. Written by the assigned
/// coach after each meeting with a builder.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MeetingReport {
    pub id: EntityId,
    pub builder_id: EntityId,
    pub coach_id: EntityId,
    pub date: Timestamp,
    pub next_meeting_date: Timestamp,
    pub objectif: String,
    pub evolution: String,
    pub whats_next: Option<String>,
    pub comments: Option<String>,
}

/// DTO for creating a meeting report. The report date is set by the
/// server; the coach id comes from the caller's profile.
#[derive(Debug, Deserialize)]
pub struct CreateMeetingReport {
    pub builder_id: EntityId,
    pub next_meeting_date: Timestamp,
    pub objectif: String,
    pub evolution: String,
    pub whats_next: Option<String>,
    pub comments: Option<String>,
}

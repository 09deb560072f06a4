//! Repository for the `meeting_reports` table.

use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::meeting_report::{CreateMeetingReport, MeetingReport};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, builder_id, coach_id, date, next_meeting_date, objectif, evolution, \
                       whats_next, comments";

/// Provides CRUD operations for meeting reports.
pub struct MeetingReportRepo;

impl MeetingReportRepo {
    /// Insert a new meeting report dated now, returning the created row.
    pub async fn create(
        pool: &PgPool,
        coach_id: &str,
        input: &CreateMeetingReport,
    ) -> Result<MeetingReport, sqlx::Error> {
        let query = format!(
            "INSERT INTO meeting_reports (id, builder_id, coach_id, next_meeting_date, \
                                          objectif, evolution, whats_next, comments)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MeetingReport>(&query)
            .bind(new_entity_id())
            .bind(&input.builder_id)
            .bind(coach_id)
            .bind(input.next_meeting_date)
            .bind(&input.objectif)
            .bind(&input.evolution)
            .bind(&input.whats_next)
            .bind(&input.comments)
            .fetch_one(pool)
            .await
    }

    /// List the meeting reports of a builder, most recent first.
    pub async fn list_by_builder(
        pool: &PgPool,
        builder_id: &str,
    ) -> Result<Vec<MeetingReport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meeting_reports WHERE builder_id = $1 ORDER BY date DESC"
        );
        sqlx::query_as::<_, MeetingReport>(&query)
            .bind(builder_id)
            .fetch_all(pool)
            .await
    }
}

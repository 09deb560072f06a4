//! Repository for the `coach_requests` table.

use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::coach_request::CoachRequest;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, coach_id, builder_id, status, date";

/// Provides CRUD operations for coach requests.
pub struct CoachRequestRepo;

impl CoachRequestRepo {
    /// Insert a new waiting request, returning the created row.
    ///
    /// The partial unique index on waiting requests makes this fail
    /// with a unique violation when the pair already has one open.
    pub async fn create(
        pool: &PgPool,
        coach_id: &str,
        builder_id: &str,
    ) -> Result<CoachRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO coach_requests (id, coach_id, builder_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoachRequest>(&query)
            .bind(new_entity_id())
            .bind(coach_id)
            .bind(builder_id)
            .fetch_one(pool)
            .await
    }

    /// Find a request by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<CoachRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coach_requests WHERE id = $1");
        sqlx::query_as::<_, CoachRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a coach's waiting requests, oldest first.
    pub async fn list_waiting_for_coach(
        pool: &PgPool,
        coach_id: &str,
    ) -> Result<Vec<CoachRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coach_requests \
             WHERE coach_id = $1 AND status = 'waiting' \
             ORDER BY date ASC"
        );
        sqlx::query_as::<_, CoachRequest>(&query)
            .bind(coach_id)
            .fetch_all(pool)
            .await
    }

    /// Close a waiting request with a decision, in a single
    /// conditional update. A racing double-answer loses with `None`.
    ///
    /// Returns the updated row, or `None` when the request does not
    /// exist or was already answered.
    pub async fn decide(
        pool: &PgPool,
        id: &str,
        status: &str,
    ) -> Result<Option<CoachRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE coach_requests \
             SET status = $2 \
             WHERE id = $1 AND status = 'waiting' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoachRequest>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}

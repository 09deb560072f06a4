//! Repository for the `build_on_returnings` table.

use buildup_core::curriculum::PENDING_RETURNING_STATUSES;
use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::returning::{BuildOnReturning, CreateReturning};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, build_on_step_id, returning_type, status, file_name, \
                       file_id, comment, refusing_reason, reviewed_by, created_at";

/// Provides CRUD operations for submitted returnings.
pub struct ReturningRepo;

impl ReturningRepo {
    /// Insert a new waiting returning, returning the created row.
    ///
    /// The partial unique index on pending submissions makes this fail
    /// with a unique violation when one is already pending for the
    /// same (project, step).
    pub async fn create(
        pool: &PgPool,
        input: &CreateReturning,
    ) -> Result<BuildOnReturning, sqlx::Error> {
        let query = format!(
            "INSERT INTO build_on_returnings (id, project_id, build_on_step_id, \
                                              returning_type, file_name, file_id, comment)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BuildOnReturning>(&query)
            .bind(new_entity_id())
            .bind(&input.project_id)
            .bind(&input.build_on_step_id)
            .bind(&input.returning_type)
            .bind(&input.file_name)
            .bind(&input.file_id)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// Find a returning by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<BuildOnReturning>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM build_on_returnings WHERE id = $1");
        sqlx::query_as::<_, BuildOnReturning>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all returnings of a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<BuildOnReturning>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM build_on_returnings \
             WHERE project_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, BuildOnReturning>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List the pending returnings visible in a review queue, oldest
    /// first. `statuses` is the set of waiting statuses the queue
    /// covers.
    pub async fn list_pending(
        pool: &PgPool,
        statuses: &[&str],
    ) -> Result<Vec<BuildOnReturning>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM build_on_returnings \
             WHERE status = ANY($1) \
             ORDER BY created_at ASC"
        );
        let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
        sqlx::query_as::<_, BuildOnReturning>(&query)
            .bind(&statuses)
            .fetch_all(pool)
            .await
    }

    /// List the pending returnings of the projects belonging to one
    /// coach's builders, oldest first.
    pub async fn list_pending_for_coach(
        pool: &PgPool,
        coach_id: &str,
        statuses: &[&str],
    ) -> Result<Vec<BuildOnReturning>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM build_on_returnings r \
             WHERE r.status = ANY($2) \
               AND r.project_id IN (
                   SELECT p.id FROM projects p
                   JOIN builders b ON b.id = p.builder_id
                   WHERE b.coach_id = $1
               ) \
             ORDER BY r.created_at ASC"
        );
        let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
        sqlx::query_as::<_, BuildOnReturning>(&query)
            .bind(coach_id)
            .bind(&statuses)
            .fetch_all(pool)
            .await
    }

    /// Close a pending returning with a decision, in a single
    /// conditional update. Only rows still in a waiting status can be
    /// decided, so a racing double-decision loses with `None`.
    ///
    /// Returns the updated row, or `None` when the returning does not
    /// exist or is no longer pending.
    pub async fn decide(
        pool: &PgPool,
        id: &str,
        status: &str,
        reviewed_by: &str,
        refusing_reason: Option<&str>,
    ) -> Result<Option<BuildOnReturning>, sqlx::Error> {
        let query = format!(
            "UPDATE build_on_returnings \
             SET status = $2, reviewed_by = $3, refusing_reason = $4 \
             WHERE id = $1 AND status = ANY($5) \
             RETURNING {COLUMNS}"
        );
        let pending: Vec<String> = PENDING_RETURNING_STATUSES
            .iter()
            .map(|s| s.to_string())
            .collect();
        sqlx::query_as::<_, BuildOnReturning>(&query)
            .bind(id)
            .bind(status)
            .bind(reviewed_by)
            .bind(refusing_reason)
            .bind(&pending)
            .fetch_optional(pool)
            .await
    }

    /// Move a pending returning to another waiting status (queue
    /// transfer). Same conditional guard as [`Self::decide`].
    pub async fn transfer(
        pool: &PgPool,
        id: &str,
        status: &str,
    ) -> Result<Option<BuildOnReturning>, sqlx::Error> {
        let query = format!(
            "UPDATE build_on_returnings \
             SET status = $2 \
             WHERE id = $1 AND status = ANY($3) \
             RETURNING {COLUMNS}"
        );
        let pending: Vec<String> = PENDING_RETURNING_STATUSES
            .iter()
            .map(|s| s.to_string())
            .collect();
        sqlx::query_as::<_, BuildOnReturning>(&query)
            .bind(id)
            .bind(status)
            .bind(&pending)
            .fetch_optional(pool)
            .await
    }
}

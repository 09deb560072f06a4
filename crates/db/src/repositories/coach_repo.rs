//! Repository for the `coaches` table.

use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::coach::{Coach, CoachWithUser, CreateCoach, UpdateCoach};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, status, step, department, situation, description, \
                       candidating_date, coach_card_id, has_signed_fiche_integration";

/// Joined column list for listings carrying user identity fields.
const JOINED_COLUMNS: &str = "c.id, c.user_id, c.status, c.step, c.department, c.situation, \
                              c.description, c.candidating_date, \
                              u.first_name, u.last_name, u.email, u.discord_tag";

/// Provides CRUD operations for coach profiles.
pub struct CoachRepo;

impl CoachRepo {
    /// Insert a new coach profile in the candidating state, returning
    /// the created row.
    pub async fn create(pool: &PgPool, input: &CreateCoach) -> Result<Coach, sqlx::Error> {
        let query = format!(
            "INSERT INTO coaches (id, user_id, department, situation, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coach>(&query)
            .bind(new_entity_id())
            .bind(&input.user_id)
            .bind(input.department.unwrap_or(0))
            .bind(&input.situation)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a coach by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Coach>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coaches WHERE id = $1");
        sqlx::query_as::<_, Coach>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every coach, oldest candidature first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Coach>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coaches ORDER BY candidating_date ASC");
        sqlx::query_as::<_, Coach>(&query).fetch_all(pool).await
    }

    /// Find the coach profile belonging to a user.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Option<Coach>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coaches WHERE user_id = $1");
        sqlx::query_as::<_, Coach>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List coaches in a given status, joined with user identity
    /// fields, oldest candidature first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
    ) -> Result<Vec<CoachWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM coaches c
             JOIN users u ON u.id = c.user_id
             WHERE c.status = $1
             ORDER BY c.candidating_date ASC"
        );
        sqlx::query_as::<_, CoachWithUser>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List coaches at a given program step, joined with user identity
    /// fields, oldest candidature first.
    pub async fn list_by_step(
        pool: &PgPool,
        step: &str,
    ) -> Result<Vec<CoachWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM coaches c
             JOIN users u ON u.id = c.user_id
             WHERE c.step = $1
             ORDER BY c.candidating_date ASC"
        );
        sqlx::query_as::<_, CoachWithUser>(&query)
            .bind(step)
            .fetch_all(pool)
            .await
    }

    /// Update a coach. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateCoach,
    ) -> Result<Option<Coach>, sqlx::Error> {
        let query = format!(
            "UPDATE coaches SET
                status = COALESCE($2, status),
                step = COALESCE($3, step),
                department = COALESCE($4, department),
                situation = COALESCE($5, situation),
                description = COALESCE($6, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coach>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.step)
            .bind(input.department)
            .bind(&input.situation)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Point a coach at a new card blob.
    pub async fn set_card(pool: &PgPool, id: &str, file_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE coaches SET coach_card_id = $2 WHERE id = $1")
            .bind(id)
            .bind(file_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record that the coach countersigned the integration fiche.
    pub async fn mark_fiche_signed(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE coaches SET has_signed_fiche_integration = true \
             WHERE id = $1 AND has_signed_fiche_integration = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

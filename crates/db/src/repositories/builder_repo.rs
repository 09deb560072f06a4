//! Repository for the `builders` table.

use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::builder::{Builder, BuilderWithUser, CreateBuilder, UpdateBuilder};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, coach_id, ntf_referent_id, status, step, department, \
                       situation, description, candidating_date, program_end_date, \
                       builder_card_id, has_signed_fiche_integration";

/// Joined column list for listings carrying user identity fields.
const JOINED_COLUMNS: &str = "b.id, b.user_id, b.coach_id, b.status, b.step, b.department, \
                              b.situation, b.description, b.candidating_date, \
                              u.first_name, u.last_name, u.email, u.discord_tag";

/// Provides CRUD operations for builder profiles.
pub struct BuilderRepo;

impl BuilderRepo {
    /// Insert a new builder profile in the candidating state,
    /// returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBuilder) -> Result<Builder, sqlx::Error> {
        let query = format!(
            "INSERT INTO builders (id, user_id, department, situation, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Builder>(&query)
            .bind(new_entity_id())
            .bind(&input.user_id)
            .bind(input.department.unwrap_or(0))
            .bind(&input.situation)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a builder by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Builder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM builders WHERE id = $1");
        sqlx::query_as::<_, Builder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the builder profile belonging to a user.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Option<Builder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM builders WHERE user_id = $1");
        sqlx::query_as::<_, Builder>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List builders in a given status, joined with user identity
    /// fields, oldest candidature first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
    ) -> Result<Vec<BuilderWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM builders b
             JOIN users u ON u.id = b.user_id
             WHERE b.status = $1
             ORDER BY b.candidating_date ASC"
        );
        sqlx::query_as::<_, BuilderWithUser>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List builders at a given program step, joined with user
    /// identity fields, oldest candidature first.
    pub async fn list_by_step(
        pool: &PgPool,
        step: &str,
    ) -> Result<Vec<BuilderWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM builders b
             JOIN users u ON u.id = b.user_id
             WHERE b.step = $1
             ORDER BY b.candidating_date ASC"
        );
        sqlx::query_as::<_, BuilderWithUser>(&query)
            .bind(step)
            .fetch_all(pool)
            .await
    }

    /// List the builders assigned to a coach.
    pub async fn list_by_coach(
        pool: &PgPool,
        coach_id: &str,
    ) -> Result<Vec<BuilderWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM builders b
             JOIN users u ON u.id = b.user_id
             WHERE b.coach_id = $1
             ORDER BY b.candidating_date ASC"
        );
        sqlx::query_as::<_, BuilderWithUser>(&query)
            .bind(coach_id)
            .fetch_all(pool)
            .await
    }

    /// Update a builder. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateBuilder,
    ) -> Result<Option<Builder>, sqlx::Error> {
        let query = format!(
            "UPDATE builders SET
                coach_id = COALESCE($2, coach_id),
                ntf_referent_id = COALESCE($3, ntf_referent_id),
                status = COALESCE($4, status),
                step = COALESCE($5, step),
                department = COALESCE($6, department),
                situation = COALESCE($7, situation),
                description = COALESCE($8, description),
                program_end_date = COALESCE($9, program_end_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Builder>(&query)
            .bind(id)
            .bind(&input.coach_id)
            .bind(&input.ntf_referent_id)
            .bind(&input.status)
            .bind(&input.step)
            .bind(input.department)
            .bind(&input.situation)
            .bind(&input.description)
            .bind(input.program_end_date)
            .fetch_optional(pool)
            .await
    }

    /// Assign or replace the builder's coach.
    pub async fn set_coach(
        pool: &PgPool,
        id: &str,
        coach_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE builders SET coach_id = $2 WHERE id = $1")
            .bind(id)
            .bind(coach_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a builder to a new step.
    pub async fn set_step(pool: &PgPool, id: &str, step: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE builders SET step = $2 WHERE id = $1")
            .bind(id)
            .bind(step)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point a builder at a new card blob.
    pub async fn set_card(pool: &PgPool, id: &str, file_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE builders SET builder_card_id = $2 WHERE id = $1")
            .bind(id)
            .bind(file_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record that the builder countersigned the integration fiche.
    pub async fn mark_fiche_signed(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE builders SET has_signed_fiche_integration = true \
             WHERE id = $1 AND has_signed_fiche_integration = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

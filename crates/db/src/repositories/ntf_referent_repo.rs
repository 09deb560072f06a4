//! Repository for the `ntf_referents` table.

use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::ntf_referent::{CreateNtfReferent, NtfReferent, UpdateNtfReferent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, discord_tag, competence";

/// Provides CRUD operations for NTF referents.
pub struct NtfReferentRepo;

impl NtfReferentRepo {
    /// Insert a new referent, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNtfReferent,
    ) -> Result<NtfReferent, sqlx::Error> {
        let query = format!(
            "INSERT INTO ntf_referents (id, first_name, last_name, email, discord_tag, competence)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NtfReferent>(&query)
            .bind(new_entity_id())
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.discord_tag)
            .bind(&input.competence)
            .fetch_one(pool)
            .await
    }

    /// Find a referent by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<NtfReferent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ntf_referents WHERE id = $1");
        sqlx::query_as::<_, NtfReferent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all referents, alphabetically by last name.
    pub async fn list(pool: &PgPool) -> Result<Vec<NtfReferent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ntf_referents ORDER BY last_name ASC");
        sqlx::query_as::<_, NtfReferent>(&query).fetch_all(pool).await
    }

    /// Update a referent. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateNtfReferent,
    ) -> Result<Option<NtfReferent>, sqlx::Error> {
        let query = format!(
            "UPDATE ntf_referents SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                discord_tag = COALESCE($5, discord_tag),
                competence = COALESCE($6, competence)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NtfReferent>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.discord_tag)
            .bind(&input.competence)
            .fetch_optional(pool)
            .await
    }
}

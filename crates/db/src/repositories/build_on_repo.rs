//! Repository for the `build_ons` and `build_on_steps` tables.

use buildup_core::curriculum::CurriculumIndex;
use buildup_core::types::{new_entity_id, EntityId};
use sqlx::PgPool;

use crate::models::build_on::{BuildOn, BuildOnStep};

/// Column list for `build_ons` queries.
const COLUMNS: &str = "id, index, name, description, image_id";

/// Column list for `build_on_steps` queries.
const STEP_COLUMNS: &str = "id, build_on_id, index, name, description, returning_type, \
                            returning_description, returning_link, image_id";

/// Provides CRUD operations for the curriculum.
pub struct BuildOnRepo;

impl BuildOnRepo {
    /// List all build-ons in curriculum order.
    pub async fn list(pool: &PgPool) -> Result<Vec<BuildOn>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM build_ons ORDER BY index ASC");
        sqlx::query_as::<_, BuildOn>(&query).fetch_all(pool).await
    }

    /// Find a build-on by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<BuildOn>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM build_ons WHERE id = $1");
        sqlx::query_as::<_, BuildOn>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the steps of a build-on in curriculum order.
    pub async fn list_steps(
        pool: &PgPool,
        build_on_id: &str,
    ) -> Result<Vec<BuildOnStep>, sqlx::Error> {
        let query = format!(
            "SELECT {STEP_COLUMNS} FROM build_on_steps WHERE build_on_id = $1 ORDER BY index ASC"
        );
        sqlx::query_as::<_, BuildOnStep>(&query)
            .bind(build_on_id)
            .fetch_all(pool)
            .await
    }

    /// Find a step by internal ID.
    pub async fn find_step_by_id(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<BuildOnStep>, sqlx::Error> {
        let query = format!("SELECT {STEP_COLUMNS} FROM build_on_steps WHERE id = $1");
        sqlx::query_as::<_, BuildOnStep>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the full curriculum ordering (build-on ids with their step
    /// ids) for cursor computations.
    pub async fn curriculum_index(pool: &PgPool) -> Result<CurriculumIndex, sqlx::Error> {
        let build_ons: Vec<(EntityId,)> =
            sqlx::query_as("SELECT id FROM build_ons ORDER BY index ASC")
                .fetch_all(pool)
                .await?;

        let mut ordering = Vec::with_capacity(build_ons.len());
        for (build_on_id,) in build_ons {
            let steps: Vec<(EntityId,)> = sqlx::query_as(
                "SELECT id FROM build_on_steps WHERE build_on_id = $1 ORDER BY index ASC",
            )
            .bind(&build_on_id)
            .fetch_all(pool)
            .await?;
            ordering.push((build_on_id, steps.into_iter().map(|(id,)| id).collect()));
        }

        Ok(CurriculumIndex::new(ordering))
    }

    /// Insert a build-on at a given curriculum position, returning the
    /// created row.
    pub async fn insert(
        pool: &PgPool,
        index: i32,
        name: &str,
        description: &str,
    ) -> Result<BuildOn, sqlx::Error> {
        let query = format!(
            "INSERT INTO build_ons (id, index, name, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BuildOn>(&query)
            .bind(new_entity_id())
            .bind(index)
            .bind(name)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Reposition and rename an existing build-on.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        index: i32,
        name: &str,
        description: &str,
    ) -> Result<Option<BuildOn>, sqlx::Error> {
        let query = format!(
            "UPDATE build_ons SET index = $2, name = $3, description = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BuildOn>(&query)
            .bind(id)
            .bind(index)
            .bind(name)
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    /// Insert a step at a given position within a build-on, returning
    /// the created row.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_step(
        pool: &PgPool,
        build_on_id: &str,
        index: i32,
        name: &str,
        description: &str,
        returning_type: &str,
        returning_description: &str,
        returning_link: Option<&str>,
    ) -> Result<BuildOnStep, sqlx::Error> {
        let query = format!(
            "INSERT INTO build_on_steps (id, build_on_id, index, name, description, \
                                         returning_type, returning_description, returning_link)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {STEP_COLUMNS}"
        );
        sqlx::query_as::<_, BuildOnStep>(&query)
            .bind(new_entity_id())
            .bind(build_on_id)
            .bind(index)
            .bind(name)
            .bind(description)
            .bind(returning_type)
            .bind(returning_description)
            .bind(returning_link)
            .fetch_one(pool)
            .await
    }

    /// Reposition and rewrite an existing step.
    ///
    /// Returns `None` if no row with the given `id` exists.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_step(
        pool: &PgPool,
        id: &str,
        index: i32,
        name: &str,
        description: &str,
        returning_type: &str,
        returning_description: &str,
        returning_link: Option<&str>,
    ) -> Result<Option<BuildOnStep>, sqlx::Error> {
        let query = format!(
            "UPDATE build_on_steps SET index = $2, name = $3, description = $4, \
                                       returning_type = $5, returning_description = $6, \
                                       returning_link = $7
             WHERE id = $1
             RETURNING {STEP_COLUMNS}"
        );
        sqlx::query_as::<_, BuildOnStep>(&query)
            .bind(id)
            .bind(index)
            .bind(name)
            .bind(description)
            .bind(returning_type)
            .bind(returning_description)
            .bind(returning_link)
            .fetch_optional(pool)
            .await
    }

    /// Point a build-on at a new image blob.
    pub async fn set_image(pool: &PgPool, id: &str, file_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE build_ons SET image_id = $2 WHERE id = $1")
            .bind(id)
            .bind(file_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point a step at a new image blob.
    pub async fn set_step_image(
        pool: &PgPool,
        id: &str,
        file_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE build_on_steps SET image_id = $2 WHERE id = $1")
            .bind(id)
            .bind(file_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a build-on. Its steps go with it.
    ///
    /// Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM build_ons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a single step.
    ///
    /// Returns `true` if the row was deleted.
    pub async fn delete_step(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM build_on_steps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

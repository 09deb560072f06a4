//! Repository for the `projects` table, including the curriculum
//! cursor operations.

use buildup_core::curriculum::Cursor;
use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, builder_id, name, categorie, description, keywords, team, \
                       launch_date, is_lucratif, is_declared, current_build_on, \
                       current_build_on_step";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// `cursor` is the first step of the curriculum at creation time,
    /// or `None` when no curriculum exists yet.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        cursor: Option<&Cursor>,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (id, builder_id, name, categorie, description, keywords, \
                                   team, launch_date, is_lucratif, is_declared, \
                                   current_build_on, current_build_on_step)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(new_entity_id())
            .bind(&input.builder_id)
            .bind(&input.name)
            .bind(&input.categorie)
            .bind(&input.description)
            .bind(&input.keywords)
            .bind(&input.team)
            .bind(input.launch_date)
            .bind(input.is_lucratif)
            .bind(input.is_declared)
            .bind(cursor.map(|c| c.build_on_id.as_str()))
            .bind(cursor.map(|c| c.build_on_step_id.as_str()))
            .fetch_one(pool)
            .await
    }

    /// Find a project by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the project owned by a builder.
    pub async fn find_by_builder_id(
        pool: &PgPool,
        builder_id: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE builder_id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(builder_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a project's descriptive fields. Only non-`None` fields
    /// in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                categorie = COALESCE($3, categorie),
                description = COALESCE($4, description),
                keywords = COALESCE($5, keywords),
                team = COALESCE($6, team),
                launch_date = COALESCE($7, launch_date),
                is_lucratif = COALESCE($8, is_lucratif),
                is_declared = COALESCE($9, is_declared)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.categorie)
            .bind(&input.description)
            .bind(&input.keywords)
            .bind(&input.team)
            .bind(input.launch_date)
            .bind(input.is_lucratif)
            .bind(input.is_declared)
            .fetch_optional(pool)
            .await
    }

    /// Advance the curriculum cursor in a single conditional update.
    ///
    /// The expected current position is part of the WHERE clause, so a
    /// racing advance loses with zero rows affected. `next` of `None`
    /// clears the cursor (program complete).
    ///
    /// Returns `true` if the cursor moved.
    pub async fn advance_cursor(
        pool: &PgPool,
        id: &str,
        expected: &Cursor,
        next: Option<&Cursor>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects \
             SET current_build_on = $4, current_build_on_step = $5 \
             WHERE id = $1 AND current_build_on = $2 AND current_build_on_step = $3",
        )
        .bind(id)
        .bind(&expected.build_on_id)
        .bind(&expected.build_on_step_id)
        .bind(next.map(|c| c.build_on_id.as_str()))
        .bind(next.map(|c| c.build_on_step_id.as_str()))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

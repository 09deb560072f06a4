//! Repository for the `users` table.

use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, birthdate, email, discord_tag, username, role, \
                       password_hash, password_salt, profile_picture_id, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, first_name, last_name, birthdate, email, discord_tag, \
                                username, role, password_hash, password_salt)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(new_entity_id())
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.birthdate)
            .bind(&input.email)
            .bind(&input.discord_tag)
            .bind(&input.username)
            .bind(&input.role)
            .bind(&input.password_hash)
            .bind(&input.password_salt)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username or email, for login. Emails are stored
    /// lowercase, so the email side compares against the lowered
    /// identifier while the username side stays exact.
    pub async fn find_by_username_or_email(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE username = $1 OR email = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update a user's identity fields. Only non-`None` fields in
    /// `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                birthdate = COALESCE($4, birthdate),
                email = COALESCE($5, email),
                discord_tag = COALESCE($6, discord_tag),
                username = COALESCE($7, username),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.birthdate)
            .bind(&input.email)
            .bind(&input.discord_tag)
            .bind(&input.username)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's password hash and salt. Returns `true` if the
    /// row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: &str,
        password_hash: &str,
        password_salt: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, password_salt = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .bind(password_salt)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point a user at a new profile picture blob.
    pub async fn set_profile_picture(
        pool: &PgPool,
        id: &str,
        file_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET profile_picture_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(file_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `forms` and `form_entries` tables.

use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::form::{Form, FormEntry, FormEntryInput};

/// Column list for `form_entries` queries.
const ENTRY_COLUMNS: &str = "id, form_id, index, question, answer";

/// Provides access to candidature forms.
pub struct FormRepo;

impl FormRepo {
    /// Store a user's candidature form with its ordered entries.
    /// Position in `entries` becomes the entry index.
    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        entries: &[FormEntryInput],
    ) -> Result<Form, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let form: Form = sqlx::query_as(
            "INSERT INTO forms (id, user_id) VALUES ($1, $2) RETURNING id, user_id",
        )
        .bind(new_entity_id())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for (index, entry) in entries.iter().enumerate() {
            sqlx::query(
                "INSERT INTO form_entries (id, form_id, index, question, answer) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(new_entity_id())
            .bind(&form.id)
            .bind(index as i32)
            .bind(&entry.question)
            .bind(&entry.answer)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(form)
    }

    /// List a user's form entries in questionnaire order.
    pub async fn list_entries_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<FormEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM form_entries \
             WHERE form_id = (SELECT id FROM forms WHERE user_id = $1) \
             ORDER BY index ASC"
        );
        sqlx::query_as::<_, FormEntry>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Look up the answer a user gave to one question, by exact
    /// question text.
    pub async fn answer_for_question(
        pool: &PgPool,
        user_id: &str,
        question: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT e.answer FROM form_entries e \
             JOIN forms f ON f.id = e.form_id \
             WHERE f.user_id = $1 AND e.question = $2",
        )
        .bind(user_id)
        .bind(question)
        .fetch_optional(pool)
        .await
    }
}

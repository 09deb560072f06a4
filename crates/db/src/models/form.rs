//! Candidature form entity models and DTOs.

use buildup_core::types::EntityId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `forms` table. One form per user, written once at
/// profile registration.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Form {
    pub id: EntityId,
    pub user_id: EntityId,
}

/// A row from the `form_entries` table: one question/answer pair,
/// ordered by `index` within its form.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormEntry {
    pub id: EntityId,
    pub form_id: EntityId,
    #[serde(skip_serializing)]
    pub index: i32,
    pub question: String,
    pub answer: String,
}

/// One question/answer pair of a registration payload. Position in
/// the submitted list becomes the entry index.
#[derive(Debug, Clone, Deserialize)]
pub struct FormEntryInput {
    pub question: String,
    pub answer: String,
}

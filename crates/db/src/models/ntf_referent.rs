//! NTF referent entity model and DTOs.

use buildup_core::types::EntityId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ntf_referents` table: a staff contact a builder can
/// be assigned to.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NtfReferent {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub discord_tag: String,
    pub competence: Option<String>,
}

/// DTO for creating an NTF referent.
#[derive(Debug, Deserialize)]
pub struct CreateNtfReferent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub discord_tag: String,
    pub competence: Option<String>,
}

/// DTO for updating an NTF referent. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNtfReferent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub discord_tag: Option<String>,
    pub competence: Option<String>,
}

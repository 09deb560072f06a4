//! Builder profile entity model and DTOs.

use buildup_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::form::FormEntryInput;

/// A row from the `builders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Builder {
    pub id: EntityId,
    pub user_id: EntityId,
    pub coach_id: Option<EntityId>,
    pub ntf_referent_id: Option<EntityId>,
    pub status: String,
    pub step: String,
    pub department: i32,
    pub situation: String,
    pub description: String,
    pub candidating_date: Timestamp,
    pub program_end_date: Option<Timestamp>,
    pub builder_card_id: Option<EntityId>,
    pub has_signed_fiche_integration: bool,
}

/// Builder row joined with the identity fields of its user, for the
/// admin candidating/active listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BuilderWithUser {
    pub id: EntityId,
    pub user_id: EntityId,
    pub coach_id: Option<EntityId>,
    pub status: String,
    pub step: String,
    pub department: i32,
    pub situation: String,
    pub description: String,
    pub candidating_date: Timestamp,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub discord_tag: String,
}

/// DTO for registering a builder profile for an existing user.
#[derive(Debug, Deserialize)]
pub struct CreateBuilder {
    pub user_id: EntityId,
    pub department: Option<i32>,
    pub situation: String,
    pub description: String,
    /// Candidature questionnaire, in display order.
    #[serde(default)]
    pub form: Vec<FormEntryInput>,
}

/// DTO for the admin-side builder update. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBuilder {
    pub coach_id: Option<EntityId>,
    pub ntf_referent_id: Option<EntityId>,
    pub status: Option<String>,
    pub step: Option<String>,
    pub department: Option<i32>,
    pub situation: Option<String>,
    pub description: Option<String>,
    pub program_end_date: Option<Timestamp>,
}

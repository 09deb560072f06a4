//! Coach profile entity model and DTOs.

use buildup_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::form::FormEntryInput;

/// A row from the `coaches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Coach {
    pub id: EntityId,
    pub user_id: EntityId,
    pub status: String,
    pub step: String,
    pub department: i32,
    pub situation: String,
    pub description: String,
    pub candidating_date: Timestamp,
    pub coach_card_id: Option<EntityId>,
    pub has_signed_fiche_integration: bool,
}

/// Coach row joined with the identity fields of its user, for the
/// admin candidating/active listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoachWithUser {
    pub id: EntityId,
    pub user_id: EntityId,
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

/// An entry of the available-coach listing shown to builders choosing
/// a coach: identity plus selected candidature answers.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableCoach {
    pub id: EntityId,
    pub user_id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub discord_tag: String,
    pub situation: String,
    pub description: String,
    /// Answer to the key-competences question of the candidature form.
    pub competences: String,
    /// Interview question/answer pairs pulled from the candidature form.
    pub answers: Vec<QuestionAnswer>,
}

/// A question with the answer a candidate gave, for profile listings.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// DTO for registering a coach profile for an existing user.
#[derive(Debug, Deserialize)]
pub struct CreateCoach {
    pub user_id: EntityId,
    pub department: Option<i32>,
    pub situation: String,
    pub description: String,
    /// Candidature questionnaire, in display order.
    #[serde(default)]
    pub form: Vec<FormEntryInput>,
}

/// DTO for the admin-side coach update. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCoach {
    pub status: Option<String>,
    pub step: Option<String>,
    pub department: Option<i32>,
    pub situation: Option<String>,
    pub description: Option<String>,
}

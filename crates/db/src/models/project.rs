//! Project entity model and DTOs.

use buildup_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `projects` table.
///
/// `current_build_on` / `current_build_on_step` form the curriculum
/// cursor. Both null means the project has completed the program.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: EntityId,
    pub builder_id: EntityId,
    pub name: String,
    pub categorie: Option<String>,
    pub description: String,
    pub keywords: String,
    pub team: String,
    pub launch_date: Timestamp,
    pub is_lucratif: bool,
    pub is_declared: bool,
    pub current_build_on: Option<EntityId>,
    pub current_build_on_step: Option<EntityId>,
}

/// DTO for submitting a new project.
#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub builder_id: EntityId,
    pub name: String,
    pub categorie: Option<String>,
    pub description: String,
    pub keywords: String,
    pub team: String,
    pub launch_date: Timestamp,
    #[serde(default)]
    pub is_lucratif: bool,
    #[serde(default)]
    pub is_declared: bool,
}

/// DTO for updating a project. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub categorie: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub team: Option<String>,
    pub launch_date: Option<Timestamp>,
    pub is_lucratif: Option<bool>,
    pub is_declared: Option<bool>,
}

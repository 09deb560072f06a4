//! Curriculum entity models (build-ons and their steps) and the sync DTOs.

use buildup_core::types::EntityId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `build_ons` table. Ordered by `index`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BuildOn {
    pub id: EntityId,
    pub index: i32,
    pub name: String,
    pub description: String,
    pub image_id: Option<EntityId>,
}

/// A row from the `build_on_steps` table. Ordered by `index` within
/// its parent build-on.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BuildOnStep {
    pub id: EntityId,
    pub build_on_id: EntityId,
    pub index: i32,
    pub name: String,
    pub description: String,
    pub returning_type: String,
    pub returning_description: String,
    pub returning_link: Option<String>,
    pub image_id: Option<EntityId>,
}

/// One element of the curriculum sync payload.
///
/// Position in the submitted list is authoritative: element N receives
/// index N. A present `id` updates that row, an absent `id` inserts a
/// new one. An `image`, when provided, is stored as a blob and the
/// row's `image_id` updated.
#[derive(Debug, Deserialize)]
pub struct BuildOnSync {
    pub id: Option<EntityId>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<Vec<u8>>,
    #[serde(default)]
    pub steps: Vec<BuildOnStepSync>,
}

/// One element of the per-build-on step sync payload.
#[derive(Debug, Deserialize)]
pub struct BuildOnStepSync {
    pub id: Option<EntityId>,
    pub name: String,
    pub description: String,
    pub returning_type: String,
    pub returning_description: String,
    pub returning_link: Option<String>,
    #[serde(default)]
    pub image: Option<Vec<u8>>,
}

/// A synced build-on together with its synced steps, as returned by
/// the sync operation.
#[derive(Debug, Serialize)]
pub struct BuildOnWithSteps {
    #[serde(flatten)]
    pub build_on: BuildOn,
    pub steps: Vec<BuildOnStep>,
}

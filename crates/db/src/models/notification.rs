//! In-app notification entity model.

use buildup_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// Append-only; the only mutation is flipping `seen`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: EntityId,
    pub owner_id: EntityId,
    pub audience: String,
    pub date: Timestamp,
    pub content: String,
    pub seen: bool,
}

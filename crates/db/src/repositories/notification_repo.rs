//! Repository for the `notifications` table.

use buildup_core::types::new_entity_id;
use sqlx::PgPool;

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, owner_id, audience, date, content, seen";

/// Provides CRUD operations for in-app notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a notification for a user, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: &str,
        audience: &str,
        content: &str,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (id, owner_id, audience, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(new_entity_id())
            .bind(owner_id)
            .bind(audience)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// List notifications for a user, newest first.
    ///
    /// When `unseen_only` is `true`, only notifications with
    /// `seen = false` are returned.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: &str,
        unseen_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unseen_only { "AND seen = false" } else { "" };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE owner_id = $1 {filter} \
             ORDER BY date DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as seen.
    ///
    /// Returns `true` if the notification was found for the given
    /// owner and updated, `false` otherwise.
    pub async fn mark_seen(
        pool: &PgPool,
        notification_id: &str,
        owner_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET seen = true \
             WHERE id = $1 AND owner_id = $2 AND seen = false",
        )
        .bind(notification_id)
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get the number of unseen notifications for a user.
    pub async fn unseen_count(pool: &PgPool, owner_id: &str) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE owner_id = $1 AND seen = false",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}

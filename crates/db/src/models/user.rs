//! User entity model and DTOs.

use buildup_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and salt -- NEVER serialize this to API
/// responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: Timestamp,
    pub email: String,
    pub discord_tag: String,
    pub username: String,
    pub role: String,
    pub password_hash: String,
    pub password_salt: String,
    pub profile_picture_id: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no credential material).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: Timestamp,
    pub email: String,
    pub discord_tag: String,
    pub username: String,
    pub role: String,
    pub profile_picture_id: Option<EntityId>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            birthdate: user.birthdate,
            email: user.email,
            discord_tag: user.discord_tag,
            username: user.username,
            role: user.role,
            profile_picture_id: user.profile_picture_id,
            created_at: user.created_at,
        }
    }
}

/// Insert payload for `users`. Built by the auth layer after the
/// password has been generated and hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: Timestamp,
    pub email: String,
    pub discord_tag: String,
    pub username: String,
    pub role: String,
    pub password_hash: String,
    pub password_salt: String,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<Timestamp>,
    pub email: Option<String>,
    pub discord_tag: Option<String>,
    pub username: Option<String>,
}

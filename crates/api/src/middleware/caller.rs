//! Resolution of an authenticated user to their program identity.
//!
//! Admins act directly on their role claim. Coaches and builders act
//! through their profile row, so the row is looked up once here and the
//! resulting [`CallerContext`] is passed to the permission checks in
//! `buildup_core::permission`.

use buildup_core::error::CoreError;
use buildup_core::permission::CallerContext;
use buildup_core::roles::{ROLE_ADMIN, ROLE_BUILDER, ROLE_COACH};
use buildup_db::repositories::{BuilderRepo, CoachRepo};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Resolve the caller's program identity from their role claim.
///
/// Fails with 403 when a coach or builder token has no matching profile
/// row (account created but never enrolled).
pub async fn resolve_caller(state: &AppState, user: &AuthUser) -> Result<CallerContext, AppError> {
    match user.role.as_str() {
        ROLE_ADMIN => Ok(CallerContext::Admin),
        ROLE_COACH => {
            let coach = CoachRepo::find_by_user_id(&state.pool, &user.user_id)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Forbidden(
                        "No coach profile for this account".into(),
                    ))
                })?;
            Ok(CallerContext::Coach { coach_id: coach.id })
        }
        ROLE_BUILDER => {
            let builder = BuilderRepo::find_by_user_id(&state.pool, &user.user_id)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Forbidden(
                        "No builder profile for this account".into(),
                    ))
                })?;
            Ok(CallerContext::Builder {
                builder_id: builder.id,
            })
        }
        other => Err(AppError::Core(CoreError::Forbidden(format!(
            "Unknown role '{other}'"
        )))),
    }
}

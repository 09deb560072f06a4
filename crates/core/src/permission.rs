//! Caller identity and the per-entity permission matrix.
//!
//! Every authenticated request resolves to a [`CallerContext`] once (admins
//! directly from their role claim, coaches and builders by looking up their
//! profile row from the caller's user id). Handlers then ask this module
//! whether the caller may touch a given entity instead of re-implementing
//! role checks per endpoint.

use crate::error::CoreError;
use crate::roles::{ROLE_ADMIN, ROLE_COACH};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// CallerContext
// ---------------------------------------------------------------------------

/// Who is making the request, resolved to their program identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerContext {
    /// Unrestricted staff access.
    Admin,
    /// A coach, identified by their coach profile id.
    Coach { coach_id: EntityId },
    /// A builder, identified by their builder profile id.
    Builder { builder_id: EntityId },
}

impl CallerContext {
    pub fn is_admin(&self) -> bool {
        matches!(self, CallerContext::Admin)
    }
}

// ---------------------------------------------------------------------------
// Entity views
// ---------------------------------------------------------------------------

/// The fields of a builder row that permission checks need.
#[derive(Debug, Clone, Copy)]
pub struct BuilderAccess<'a> {
    pub builder_id: &'a str,
    pub coach_id: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// May the caller read or mutate this builder (and the entities hanging off
/// it: user identity, project, form, meeting reports, returnings)?
///
/// Admin always may. A coach may only when the builder is assigned to them.
/// A builder may only when it is their own profile.
pub fn resolve_builder_access(
    caller: &CallerContext,
    builder: BuilderAccess<'_>,
) -> Result<(), CoreError> {
    match caller {
        CallerContext::Admin => Ok(()),
        CallerContext::Coach { coach_id } => {
            if builder.coach_id == Some(coach_id.as_str()) {
                Ok(())
            } else {
                Err(CoreError::Forbidden(
                    "This builder is not assigned to you".to_string(),
                ))
            }
        }
        CallerContext::Builder { builder_id } => {
            if builder.builder_id == builder_id {
                Ok(())
            } else {
                Err(CoreError::Forbidden(
                    "You can only access your own profile".to_string(),
                ))
            }
        }
    }
}

/// May the caller read or mutate this coach profile?
///
/// Admin always may; a coach only their own profile. Builders go through
/// their builder record instead (their assigned coach is resolved from it),
/// so direct coach access is denied here.
pub fn resolve_coach_access(caller: &CallerContext, coach_id: &str) -> Result<(), CoreError> {
    match caller {
        CallerContext::Admin => Ok(()),
        CallerContext::Coach { coach_id: own } => {
            if own == coach_id {
                Ok(())
            } else {
                Err(CoreError::Forbidden(
                    "You can only access your own profile".to_string(),
                ))
            }
        }
        CallerContext::Builder { .. } => Err(CoreError::Forbidden(
            "Builders cannot access coach records directly".to_string(),
        )),
    }
}

/// May the caller decide (accept or refuse) a returning for this builder's
/// project? Returns the reviewer role recorded on the decision.
pub fn resolve_returning_reviewer(
    caller: &CallerContext,
    builder: BuilderAccess<'_>,
) -> Result<&'static str, CoreError> {
    match caller {
        CallerContext::Admin => Ok(ROLE_ADMIN),
        CallerContext::Coach { coach_id } => {
            if builder.coach_id == Some(coach_id.as_str()) {
                Ok(ROLE_COACH)
            } else {
                Err(CoreError::Forbidden(
                    "This builder is not assigned to you".to_string(),
                ))
            }
        }
        CallerContext::Builder { .. } => Err(CoreError::Forbidden(
            "Builders cannot review returnings".to_string(),
        )),
    }
}

/// May the caller submit a returning for this builder's project?
///
/// Only the builder who owns the project may submit.
pub fn resolve_returning_submitter(
    caller: &CallerContext,
    builder: BuilderAccess<'_>,
) -> Result<(), CoreError> {
    match caller {
        CallerContext::Builder { builder_id } if builder.builder_id == builder_id => Ok(()),
        CallerContext::Builder { .. } => Err(CoreError::Forbidden(
            "You can only submit for your own project".to_string(),
        )),
        _ => Err(CoreError::Forbidden(
            "Only the project's builder can submit a returning".to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

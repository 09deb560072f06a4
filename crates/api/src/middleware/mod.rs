//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`caller::resolve_caller`] -- Resolves the caller's program identity.

pub mod auth;
pub mod caller;
pub mod rbac;

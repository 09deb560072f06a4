//! Domain types and rules for the Build Up mentorship program.
//!
//! This crate has no database or HTTP dependencies. It holds:
//!
//! - [`types`] -- entity id and timestamp types.
//! - [`error`] -- the [`CoreError`] taxonomy shared by every layer.
//! - [`roles`] -- well-known role names.
//! - [`profile`] -- builder/coach statuses, program steps, and legal
//!   transitions.
//! - [`curriculum`] -- build-on ordering, the project step cursor, and
//!   returning submission rules.
//! - [`permission`] -- the [`CallerContext`] permission matrix.
//! - [`validate`] -- field validation helpers.

pub mod curriculum;
pub mod error;
pub mod permission;
pub mod profile;
pub mod roles;
pub mod types;
pub mod validate;

pub use error::CoreError;
pub use permission::CallerContext;
pub use types::{EntityId, Timestamp};

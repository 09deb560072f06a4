//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Entities carrying credential material (`User`) get a separate
//! `Serialize` response struct instead of being serialized directly.

pub mod build_on;
pub mod builder;
pub mod coach;
pub mod coach_request;
pub mod form;
pub mod meeting_report;
pub mod notification;
pub mod ntf_referent;
pub mod project;
pub mod returning;
pub mod stored_file;
pub mod user;

//! Request handlers for the Build Up program entities.
//!
//! Each submodule provides async handler functions for a single
//! resource. Handlers resolve the caller's program identity, delegate
//! to the repositories in `buildup_db`, and hand side effects (emails,
//! in-app notifications) to the dispatcher after the database work is
//! done.

pub mod builders;
pub mod buildons;
pub mod coach_requests;
pub mod coachs;
pub mod files;
pub mod meeting_reports;
pub mod notifications;
pub mod ntf_referents;
pub mod pdf;
pub mod projects;
pub mod returnings;
pub mod users;

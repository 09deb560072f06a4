//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Entity ids are minted
//! here (24-character hex, see `buildup_core::types`) rather than by
//! the database.

pub mod build_on_repo;
pub mod builder_repo;
pub mod coach_repo;
pub mod coach_request_repo;
pub mod file_repo;
pub mod form_repo;
pub mod meeting_report_repo;
pub mod notification_repo;
pub mod ntf_referent_repo;
pub mod project_repo;
pub mod returning_repo;
pub mod user_repo;

pub use build_on_repo::BuildOnRepo;
pub use builder_repo::BuilderRepo;
pub use coach_repo::CoachRepo;
pub use coach_request_repo::CoachRequestRepo;
pub use file_repo::FileRepo;
pub use form_repo::FormRepo;
pub use meeting_report_repo::MeetingReportRepo;
pub use notification_repo::NotificationRepo;
pub use ntf_referent_repo::NtfReferentRepo;
pub use project_repo::ProjectRepo;
pub use returning_repo::ReturningRepo;
pub use user_repo::UserRepo;

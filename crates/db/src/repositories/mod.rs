//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod assignment_repo;
pub mod calendar_repo;
pub mod meeting_repo;
pub mod role_repo;
pub mod session_repo;
pub mod submission_repo;
pub mod user_repo;

pub use assignment_repo::AssignmentRepo;
pub use calendar_repo::CalendarRepo;
pub use meeting_repo::MeetingRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use submission_repo::SubmissionRepo;
pub use user_repo::UserRepo;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-step writes open their own
//! transaction.

pub mod brief_repo;
pub mod calendar_event_repo;
pub mod file_repo;
pub mod project_repo;
pub mod report_repo;
pub mod task_repo;
pub mod weekly_note_repo;

pub use brief_repo::BriefRepo;
pub use calendar_event_repo::CalendarEventRepo;
pub use file_repo::FileRepo;
pub use project_repo::ProjectRepo;
pub use report_repo::ReportRepo;
pub use task_repo::TaskRepo;
pub use weekly_note_repo::WeeklyNoteRepo;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod brochure_repo;
pub mod comment_repo;
pub mod file_repo;
pub mod lead_repo;
pub mod project_repo;
pub mod session_repo;
pub mod stage_repo;
pub mod task_repo;
pub mod user_repo;

pub use brochure_repo::{BrochurePageRepo, BrochureRepo, PageCommentRepo};
pub use comment_repo::{CommentTaskRepo, GlobalCommentRepo};
pub use file_repo::{DownloadHistoryRepo, FileRepo};
pub use lead_repo::LeadRepo;
pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use stage_repo::StageRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;

//! Comment-task and project discussion models.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use xeetrack_core::roles::Role;
use xeetrack_core::status::WorkStatus;
use xeetrack_core::types::{DbId, Timestamp};

/// A client comment promoted to a trackable task.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentTask {
    pub id: DbId,
    pub project_id: DbId,
    pub stage_id: Option<DbId>,
    pub text: String,
    pub added_by: DbId,
    pub author_name: String,
    #[sqlx(try_from = "String")]
    pub author_role: Role,
    #[sqlx(try_from = "String")]
    pub status: WorkStatus,
    pub assigned_to: Option<DbId>,
    pub deadline: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateCommentTask {
    pub project_id: DbId,
    pub stage_id: Option<DbId>,
    pub text: String,
    pub added_by: DbId,
    pub author_name: String,
    pub author_role: Role,
    pub status: WorkStatus,
    pub assigned_to: Option<DbId>,
    pub deadline: Option<NaiveDate>,
}

/// A project-level discussion entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GlobalComment {
    pub id: DbId,
    pub project_id: DbId,
    pub text: String,
    pub added_by: DbId,
    pub author_name: String,
    #[sqlx(try_from = "String")]
    pub author_role: Role,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateGlobalComment {
    pub project_id: DbId,
    pub text: String,
    pub added_by: DbId,
    pub author_name: String,
    pub author_role: Role,
}

//! Manager-assigned task model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use xeetrack_core::status::{Priority, WorkStatus};
use xeetrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: DbId,
    pub created_by: DbId,
    #[sqlx(try_from = "String")]
    pub status: WorkStatus,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated insert: title is trimmed and non-empty, assignee present.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: DbId,
    pub created_by: DbId,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<DbId>,
    pub status: Option<WorkStatus>,
    pub priority: Option<Priority>,
    pub deadline: Option<NaiveDate>,
}

//! Project stage model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use xeetrack_core::status::ApprovalStatus;
use xeetrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Stage {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub sort_order: i32,
    pub notes: Option<String>,
    pub progress_percentage: i32,
    #[sqlx(try_from = "String")]
    pub approval_status: ApprovalStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Staff-editable stage fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStage {
    pub notes: Option<String>,
    pub progress_percentage: Option<i32>,
}

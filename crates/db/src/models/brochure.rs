//! Brochure project, page and page-comment models.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use xeetrack_core::brochure::{PageContent, PageKind, PageLock};
use xeetrack_core::error::CoreError;
use xeetrack_core::roles::Role;
use xeetrack_core::status::{ApprovalStatus, BrochureStatus, PageActionType};
use xeetrack_core::types::{DbId, Timestamp};

/// A brochure row joined with its client's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BrochureProject {
    pub id: DbId,
    pub client_id: DbId,
    pub client_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: BrochureStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BrochurePage {
    pub id: DbId,
    pub brochure_id: DbId,
    pub page_number: i32,
    #[sqlx(try_from = "String")]
    pub approval_status: ApprovalStatus,
    pub is_locked: bool,
    pub locked_by: Option<DbId>,
    pub locked_by_name: Option<String>,
    pub locked_at: Option<Timestamp>,
    pub content: Json<PageContent>,
    /// Bumped on every content save; used for optimistic concurrency.
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BrochurePage {
    pub fn lock_state(&self) -> PageLock {
        PageLock {
            is_locked: self.is_locked,
            locked_by: self.locked_by,
            locked_by_name: self.locked_by_name.clone(),
            locked_at: self.locked_at,
        }
    }

    pub fn kind(&self) -> Result<PageKind, CoreError> {
        PageKind::from_page_number(self.page_number)
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageComment {
    pub id: DbId,
    pub page_id: DbId,
    pub text: String,
    pub added_by: DbId,
    pub author_name: String,
    #[sqlx(try_from = "String")]
    pub author_role: Role,
    pub marked_done: bool,
    #[sqlx(try_from = "String")]
    pub action_type: PageActionType,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreatePageComment {
    pub page_id: DbId,
    pub text: String,
    pub added_by: DbId,
    pub author_name: String,
    pub author_role: Role,
    pub action_type: PageActionType,
}

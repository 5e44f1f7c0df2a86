//! Comment composer routing and comment-task status rules.

use crate::error::CoreError;
use crate::roles::Role;
use crate::status::WorkStatus;
use crate::types::Actor;

/// Where a comment posted through the shared composer is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentRoute {
    /// Stored as a comment-task with the given initial status.
    Task { status: WorkStatus },
    /// Stored as a project-level discussion entry.
    Global,
}

/// Clients' comments become open tasks for the agency; staff comments are
/// plain discussion.
pub fn route_comment(role: Role) -> CommentRoute {
    match role {
        Role::Client => CommentRoute::Task {
            status: WorkStatus::Open,
        },
        Role::Manager | Role::Employee => CommentRoute::Global,
    }
}

/// Trim comment text and reject it when blank.
pub fn clean_comment_text(text: &str) -> Result<String, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("Comment text is required"));
    }
    Ok(trimmed.to_string())
}

/// Only managers and employees move comment-tasks between statuses.
pub fn ensure_can_change_comment_task_status(actor: &Actor) -> Result<(), CoreError> {
    if actor.is_staff() {
        Ok(())
    } else {
        Err(CoreError::forbidden(
            "Only managers and employees may change comment-task status",
        ))
    }
}

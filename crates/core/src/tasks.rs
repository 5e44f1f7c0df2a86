//! Manager-assigned task rules.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::{Actor, DbId};

/// Trim a task title, rejecting blank ones.
pub fn clean_task_title(title: &str) -> Result<String, CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::validation("Task title is required"));
    }
    Ok(title.to_string())
}

/// Validate the fields a new task must have, returning the trimmed title and
/// the assignee.
pub fn validate_new_task(
    title: &str,
    assigned_to: Option<DbId>,
) -> Result<(String, DbId), CoreError> {
    let title = clean_task_title(title)?;
    let assignee = assigned_to
        .ok_or_else(|| CoreError::validation("Task must be assigned to an employee"))?;
    Ok((title, assignee))
}

/// Creating, editing and deleting tasks is a manager action.
pub fn ensure_can_manage_tasks(actor: &Actor) -> Result<(), CoreError> {
    if actor.role == Role::Manager {
        Ok(())
    } else {
        Err(CoreError::forbidden("Only managers may manage tasks"))
    }
}

/// Status moves are open to the manager and to the assignee.
pub fn ensure_can_update_task_status(actor: &Actor, assigned_to: DbId) -> Result<(), CoreError> {
    if actor.role == Role::Manager || actor.id == assigned_to {
        Ok(())
    } else {
        Err(CoreError::forbidden(
            "Only the assignee or a manager may change task status",
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn title_and_assignee_required() {
        assert_matches!(validate_new_task("  ", Some(1)), Err(CoreError::Validation(_)));
        assert_matches!(validate_new_task("Hero banner", None), Err(CoreError::Validation(_)));
        assert_eq!(
            validate_new_task(" Hero banner ", Some(2)).unwrap(),
            ("Hero banner".to_string(), 2)
        );
    }

    #[test]
    fn status_permissions() {
        assert!(ensure_can_update_task_status(&Actor::new(2, "E", Role::Employee), 2).is_ok());
        assert!(ensure_can_update_task_status(&Actor::new(5, "E", Role::Employee), 2).is_err());
        assert!(ensure_can_update_task_status(&Actor::new(1, "M", Role::Manager), 2).is_ok());
    }

    #[test]
    fn management_is_manager_only() {
        assert!(ensure_can_manage_tasks(&Actor::new(1, "M", Role::Manager)).is_ok());
        assert!(ensure_can_manage_tasks(&Actor::new(2, "E", Role::Employee)).is_err());
    }
}

//! The fixed five-stage project template and stage permissions.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::Actor;
use crate::visibility::{can_view_project, ProjectMembership};

/// Stage names in delivery order. Every project gets exactly these, with
/// `sort_order` equal to the index.
pub const STAGE_NAMES: [&str; 5] = ["Planning", "Design", "Development", "QC", "Launch"];

/// `(name, sort_order)` pairs for a new project's stages.
pub fn stage_template() -> impl Iterator<Item = (&'static str, i32)> {
    STAGE_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i as i32))
}

/// The project's client signs stages off; managers may do so on their behalf.
pub fn ensure_can_decide_stage<P: ProjectMembership + ?Sized>(
    actor: &Actor,
    project: &P,
) -> Result<(), CoreError> {
    let allowed = match actor.role {
        Role::Manager => true,
        Role::Client => project.client_id() == actor.id,
        Role::Employee => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(CoreError::forbidden(
            "Only the project's client or a manager may approve stages",
        ))
    }
}

/// Progress and notes are maintained by staff working on the project.
pub fn ensure_can_update_stage<P: ProjectMembership + ?Sized>(
    actor: &Actor,
    project: &P,
) -> Result<(), CoreError> {
    if actor.is_staff() && can_view_project(actor, project) {
        Ok(())
    } else {
        Err(CoreError::forbidden(
            "Only staff on the project may update stage progress",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DbId;

    struct P;
    impl ProjectMembership for P {
        fn project_id(&self) -> DbId {
            1
        }
        fn client_id(&self) -> DbId {
            3
        }
        fn assigned_employees(&self) -> &[DbId] {
            &[2]
        }
    }

    #[test]
    fn template_is_ordered() {
        let stages: Vec<_> = stage_template().collect();
        assert_eq!(stages.len(), 5);
        assert_eq!(stages[0], ("Planning", 0));
        assert_eq!(stages[4], ("Launch", 4));
        assert!(stages.windows(2).all(|w| w[0].1 < w[1].1));
    }

    #[test]
    fn stage_decisions() {
        assert!(ensure_can_decide_stage(&Actor::new(3, "C", Role::Client), &P).is_ok());
        assert!(ensure_can_decide_stage(&Actor::new(4, "C", Role::Client), &P).is_err());
        assert!(ensure_can_decide_stage(&Actor::new(2, "E", Role::Employee), &P).is_err());
        assert!(ensure_can_decide_stage(&Actor::new(1, "M", Role::Manager), &P).is_ok());
    }

    #[test]
    fn stage_updates() {
        assert!(ensure_can_update_stage(&Actor::new(2, "E", Role::Employee), &P).is_ok());
        assert!(ensure_can_update_stage(&Actor::new(5, "E", Role::Employee), &P).is_err());
        assert!(ensure_can_update_stage(&Actor::new(3, "C", Role::Client), &P).is_err());
    }
}

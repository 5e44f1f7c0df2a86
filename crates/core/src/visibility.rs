//! Role-based visibility rules.
//!
//! A manager sees everything. An employee sees a project when they are in its
//! `assigned_employees`; a client sees a project they own. Stages, tasks,
//! comment-tasks, global comments and files inherit the visibility of their
//! project. Nothing here is cached: callers evaluate the rules per request.

use std::collections::HashSet;

use crate::roles::Role;
use crate::status::BrochureStatus;
use crate::types::{Actor, DbId};

/// The ownership/assignment facts needed to decide project visibility.
pub trait ProjectMembership {
    fn project_id(&self) -> DbId;
    fn client_id(&self) -> DbId;
    fn assigned_employees(&self) -> &[DbId];
}

/// Whether `actor` may see `project`.
pub fn can_view_project<P: ProjectMembership + ?Sized>(actor: &Actor, project: &P) -> bool {
    match actor.role {
        Role::Manager => true,
        Role::Employee => project.assigned_employees().contains(&actor.id),
        Role::Client => project.client_id() == actor.id,
    }
}

/// Whether `actor` may see the download history entry of a file in `project`.
///
/// Clients never see download history.
pub fn can_view_download_history<P: ProjectMembership + ?Sized>(actor: &Actor, project: &P) -> bool {
    actor.role != Role::Client && can_view_project(actor, project)
}

/// Whether `actor` may see a brochure owned by `client_id` in `status`.
///
/// Employees pick brochures up once the client has submitted them, so drafts
/// stay private to the client and managers.
pub fn can_view_brochure(actor: &Actor, client_id: DbId, status: BrochureStatus) -> bool {
    match actor.role {
        Role::Manager => true,
        Role::Employee => status != BrochureStatus::Draft,
        Role::Client => client_id == actor.id,
    }
}

/// The set of project ids visible to one actor, computed from a project list.
///
/// Used to filter dependent collections (tasks, files, ...) in one pass.
#[derive(Debug, Clone, Default)]
pub struct VisibleProjects {
    ids: HashSet<DbId>,
}

impl VisibleProjects {
    pub fn compute<'a, P, I>(actor: &Actor, projects: I) -> Self
    where
        P: ProjectMembership + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        let ids = projects
            .into_iter()
            .filter(|p| can_view_project(actor, *p))
            .map(|p| p.project_id())
            .collect();
        Self { ids }
    }

    pub fn contains(&self, project_id: DbId) -> bool {
        self.ids.contains(&project_id)
    }

    /// Keep only the items whose project is visible.
    pub fn retain<T>(&self, items: Vec<T>, project_of: impl Fn(&T) -> DbId) -> Vec<T> {
        items
            .into_iter()
            .filter(|item| self.contains(project_of(item)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

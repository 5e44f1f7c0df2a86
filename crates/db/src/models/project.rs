//! Project entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use xeetrack_core::status::{Priority, ProjectStatus};
use xeetrack_core::types::{DbId, Timestamp};
use xeetrack_core::visibility::ProjectMembership;

/// A project row joined with its client's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub client_id: DbId,
    pub client_name: Option<String>,
    pub assigned_employees: Vec<DbId>,
    pub deadline: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub progress_percentage: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectMembership for Project {
    fn project_id(&self) -> DbId {
        self.id
    }

    fn client_id(&self) -> DbId {
        self.client_id
    }

    fn assigned_employees(&self) -> &[DbId] {
        &self.assigned_employees
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: Option<String>,
    pub client_id: DbId,
    #[serde(default)]
    pub assigned_employees: Vec<DbId>,
    pub deadline: Option<NaiveDate>,
    /// Defaults to `active` if omitted.
    pub status: Option<ProjectStatus>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<Priority>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_employees: Option<Vec<DbId>>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub progress_percentage: Option<i32>,
}

//! Role-aware dashboard summary.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use xeetrack_core::progress::average_percent;
use xeetrack_core::roles::Role;
use xeetrack_core::status::{ProjectStatus, WorkStatus};
use xeetrack_core::visibility::{can_view_project, VisibleProjects};
use xeetrack_db::models::lead::LeadPipeline;
use xeetrack_db::repositories::{CommentTaskRepo, LeadRepo, ProjectRepo, TaskRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: ProjectStatus,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_projects: usize,
    /// One entry per project status, zero counts included.
    pub projects_by_status: Vec<StatusCount>,
    /// Rounded mean of `progress_percentage` over the visible projects.
    pub average_progress: i32,
    /// Tasks not yet done. Employees count only their own.
    pub open_tasks: usize,
    pub open_comment_tasks: usize,
    /// Present for managers only.
    pub lead_pipeline: Option<LeadPipeline>,
}

/// GET /api/v1/dashboard
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let actor = auth.actor();
    let projects: Vec<_> = ProjectRepo::list(&state.pool)
        .await?
        .into_iter()
        .filter(|p| can_view_project(&actor, p))
        .collect();
    let visible = VisibleProjects::compute(&actor, &projects);

    let projects_by_status = ProjectStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: projects.iter().filter(|p| p.status == status).count(),
        })
        .collect();
    let average_progress = average_percent(projects.iter().map(|p| p.progress_percentage));

    let open_tasks = visible
        .retain(TaskRepo::list(&state.pool).await?, |t| t.project_id)
        .iter()
        .filter(|t| t.status != WorkStatus::Done)
        .filter(|t| actor.role != Role::Employee || t.assigned_to == actor.id)
        .count();
    let open_comment_tasks = visible
        .retain(CommentTaskRepo::list(&state.pool).await?, |t| t.project_id)
        .iter()
        .filter(|t| t.status != WorkStatus::Done)
        .count();

    let lead_pipeline = match actor.role {
        Role::Manager => Some(LeadRepo::pipeline(&state.pool).await?),
        Role::Employee | Role::Client => None,
    };

    Ok(Json(DataResponse::new(DashboardSummary {
        total_projects: projects.len(),
        projects_by_status,
        average_progress,
        open_tasks,
        open_comment_tasks,
        lead_pipeline,
    })))
}

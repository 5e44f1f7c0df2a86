//! Handlers for manager-assigned tasks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use xeetrack_core::error::CoreError;
use xeetrack_core::status::{Priority, WorkStatus};
use xeetrack_core::tasks::{
    clean_task_title, ensure_can_manage_tasks, ensure_can_update_task_status, validate_new_task,
};
use xeetrack_core::types::{Actor, DbId};
use xeetrack_core::visibility::VisibleProjects;
use xeetrack_db::models::project::Project;
use xeetrack_db::models::task::{CreateTask, Task, UpdateTask};
use xeetrack_db::repositories::{ProjectRepo, TaskRepo};
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::error::{AppError, AppResult};
use crate::handlers::projects::find_visible_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/tasks`.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<DbId>,
    pub priority: Option<Priority>,
    pub deadline: Option<NaiveDate>,
}

/// Request body for `PATCH /tasks/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct TaskStatusRequest {
    pub status: WorkStatus,
}

fn ensure_on_team(project: &Project, employee_id: DbId) -> AppResult<()> {
    if project.assigned_employees.contains(&employee_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "User {employee_id} is not assigned to project {}",
            project.id
        ))))
    }
}

async fn find_task(state: &AppState, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))
}

/// Load a task and the project it belongs to, checking visibility.
async fn find_visible_task(state: &AppState, actor: &Actor, id: DbId) -> AppResult<(Task, Project)> {
    let task = find_task(state, id).await?;
    let project = find_visible_project(&state.pool, actor, task.project_id).await?;
    Ok((task, project))
}

/// POST /api/v1/projects/{id}/tasks
///
/// Tasks start `open`; priority defaults to medium.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    let actor = auth.actor();
    ensure_can_manage_tasks(&actor)?;
    let (title, assigned_to) = validate_new_task(&input.title, input.assigned_to)?;
    let project = find_visible_project(&state.pool, &actor, project_id).await?;
    ensure_on_team(&project, assigned_to)?;

    let task = TaskRepo::create(
        &state.pool,
        &CreateTask {
            project_id,
            title,
            description: input.description,
            assigned_to,
            created_by: actor.id,
            priority: input.priority.unwrap_or_default(),
            deadline: input.deadline,
        },
    )
    .await?;

    tracing::info!(task_id = task.id, project_id, assigned_to, "Task created");
    state.publish(
        ChangeEvent::inserted(ChangeTable::Tasks, task.id)
            .in_project(project_id)
            .by(actor.id),
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(task))))
}

/// GET /api/v1/tasks
///
/// Tasks on every project the caller can see. Clients see their projects'
/// tasks too, read-only.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let actor = auth.actor();
    let projects = ProjectRepo::list(&state.pool).await?;
    let visible = VisibleProjects::compute(&actor, &projects);
    let tasks = visible.retain(TaskRepo::list(&state.pool).await?, |t| t.project_id);
    Ok(Json(DataResponse::new(tasks)))
}

/// GET /api/v1/projects/{id}/tasks
pub async fn list_by_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    find_visible_project(&state.pool, &auth.actor(), project_id).await?;
    let tasks = TaskRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse::new(tasks)))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    let actor = auth.actor();
    ensure_can_manage_tasks(&actor)?;
    let (_, project) = find_visible_task(&state, &actor, id).await?;

    if let Some(title) = input.title.as_mut() {
        *title = clean_task_title(title)?;
    }
    if let Some(assignee) = input.assigned_to {
        ensure_on_team(&project, assignee)?;
    }

    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;

    state.publish(
        ChangeEvent::updated(ChangeTable::Tasks, id)
            .in_project(project.id)
            .by(actor.id),
    );
    Ok(Json(DataResponse::new(task)))
}

/// PATCH /api/v1/tasks/{id}/status
///
/// The assignee or a manager moves a task between open, in-progress and done.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<TaskStatusRequest>,
) -> AppResult<Json<DataResponse<Task>>> {
    let actor = auth.actor();
    let (task, project) = find_visible_task(&state, &actor, id).await?;
    ensure_can_update_task_status(&actor, task.assigned_to)?;

    let task = TaskRepo::update_status(&state.pool, id, input.status)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;

    tracing::info!(task_id = id, actor_id = actor.id, status = %input.status, "Task status changed");
    state.publish(
        ChangeEvent::updated(ChangeTable::Tasks, id)
            .in_project(project.id)
            .by(actor.id),
    );
    Ok(Json(DataResponse::new(task)))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let actor = auth.actor();
    ensure_can_manage_tasks(&actor)?;
    let task = find_task(&state, id).await?;

    if !TaskRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Task", id));
    }

    state.publish(
        ChangeEvent::deleted(ChangeTable::Tasks, id)
            .in_project(task.project_id)
            .by(actor.id),
    );
    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for the `/projects` resource and its project-scoped lists.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use xeetrack_core::error::CoreError;
use xeetrack_core::roles::Role;
use xeetrack_core::status::validate_percentage;
use xeetrack_core::types::{Actor, DbId};
use xeetrack_core::visibility::can_view_project;
use xeetrack_db::models::project::{CreateProject, Project, UpdateProject};
use xeetrack_db::models::stage::Stage;
use xeetrack_db::repositories::{ProjectRepo, StageRepo, UserRepo};
use xeetrack_db::DbPool;
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a project and verify `actor` may see it.
///
/// Shared by every handler that works on a project-scoped row.
pub(crate) async fn find_visible_project(
    pool: &DbPool,
    actor: &Actor,
    id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;

    if !can_view_project(actor, &project) {
        return Err(AppError::Core(CoreError::forbidden(
            "You do not have access to this project",
        )));
    }
    Ok(project)
}

/// Check that `id` is an active account with `role`.
async fn ensure_role(pool: &DbPool, id: DbId, role: Role) -> AppResult<()> {
    let profile = UserRepo::find_by_id(pool, id).await?;
    match profile {
        Some(p) if p.role == role && p.is_active => Ok(()),
        _ => Err(AppError::Core(CoreError::Validation(format!(
            "User {id} is not an active {role}"
        )))),
    }
}

async fn ensure_employees(pool: &DbPool, ids: &[DbId]) -> AppResult<()> {
    for id in ids {
        ensure_role(pool, *id, Role::Employee).await?;
    }
    Ok(())
}

fn ensure_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::Core(CoreError::validation("Project title is required")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
///
/// Creates the project with its five template stages.
pub async fn create(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Json(mut input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    ensure_title(&input.title)?;
    input.title = input.title.trim().to_string();
    ensure_role(&state.pool, input.client_id, Role::Client).await?;
    input.assigned_employees.sort_unstable();
    input.assigned_employees.dedup();
    ensure_employees(&state.pool, &input.assigned_employees).await?;

    let project = ProjectRepo::create(&state.pool, &input).await?;

    tracing::info!(project_id = project.id, client_id = project.client_id, "Project created");
    state.publish(
        ChangeEvent::inserted(ChangeTable::Projects, project.id)
            .in_project(project.id)
            .by(auth.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(project))))
}

/// GET /api/v1/projects
///
/// Only the projects the caller may see.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let actor = auth.actor();
    let projects = ProjectRepo::list(&state.pool)
        .await?
        .into_iter()
        .filter(|p| can_view_project(&actor, p))
        .collect();
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_visible_project(&state.pool, &auth.actor(), id).await?;
    Ok(Json(DataResponse::new(project)))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    if let Some(title) = input.title.as_mut() {
        ensure_title(title)?;
        *title = title.trim().to_string();
    }
    if let Some(progress) = input.progress_percentage {
        validate_percentage(progress)?;
    }
    if let Some(employees) = input.assigned_employees.as_mut() {
        employees.sort_unstable();
        employees.dedup();
        ensure_employees(&state.pool, employees).await?;
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;

    tracing::info!(project_id = id, updated_by = auth.user_id, "Project updated");
    state.publish(
        ChangeEvent::updated(ChangeTable::Projects, id)
            .in_project(id)
            .by(auth.user_id),
    );

    Ok(Json(DataResponse::new(project)))
}

/// GET /api/v1/projects/{id}/stages
///
/// The five stages in delivery order.
pub async fn list_stages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Stage>>>> {
    find_visible_project(&state.pool, &auth.actor(), id).await?;
    let stages = StageRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(DataResponse::new(stages)))
}

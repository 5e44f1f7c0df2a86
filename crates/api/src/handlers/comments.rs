//! The shared comment composer, project discussion, and comment-tasks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use xeetrack_core::comments::{
    clean_comment_text, ensure_can_change_comment_task_status, route_comment, CommentRoute,
};
use xeetrack_core::error::CoreError;
use xeetrack_core::status::WorkStatus;
use xeetrack_core::types::DbId;
use xeetrack_core::visibility::VisibleProjects;
use xeetrack_db::models::comment::{
    CommentTask, CreateCommentTask, CreateGlobalComment, GlobalComment,
};
use xeetrack_db::repositories::{CommentTaskRepo, GlobalCommentRepo, ProjectRepo, StageRepo};
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::error::{AppError, AppResult};
use crate::handlers::projects::find_visible_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct PostCommentRequest {
    #[serde(default)]
    pub text: String,
    /// Attach a client comment to a stage.
    pub stage_id: Option<DbId>,
}

/// What the composer stored.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "comment", rename_all = "snake_case")]
pub enum PostedComment {
    Task(CommentTask),
    Global(GlobalComment),
}

/// Request body for `PATCH /comment-tasks/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct CommentTaskStatusRequest {
    pub status: WorkStatus,
}

/// POST /api/v1/projects/{id}/comments
///
/// Client comments become open comment-tasks; staff comments become
/// project discussion entries.
pub async fn post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<PostCommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PostedComment>>)> {
    let actor = auth.actor();
    let text = clean_comment_text(&input.text)?;
    find_visible_project(&state.pool, &actor, project_id).await?;

    if let Some(stage_id) = input.stage_id {
        let stage = StageRepo::find_by_id(&state.pool, stage_id)
            .await?
            .ok_or_else(|| AppError::not_found("Stage", stage_id))?;
        if stage.project_id != project_id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Stage {stage_id} does not belong to project {project_id}"
            ))));
        }
    }

    let posted = match route_comment(actor.role) {
        CommentRoute::Task { status } => {
            let task = CommentTaskRepo::create(
                &state.pool,
                &CreateCommentTask {
                    project_id,
                    stage_id: input.stage_id,
                    text,
                    added_by: actor.id,
                    author_name: actor.name.clone(),
                    author_role: actor.role,
                    status,
                    assigned_to: None,
                    deadline: None,
                },
            )
            .await?;
            tracing::info!(comment_task_id = task.id, project_id, "Client comment raised as task");
            state.publish(
                ChangeEvent::inserted(ChangeTable::CommentTasks, task.id)
                    .in_project(project_id)
                    .by(actor.id),
            );
            PostedComment::Task(task)
        }
        CommentRoute::Global => {
            let comment = GlobalCommentRepo::create(
                &state.pool,
                &CreateGlobalComment {
                    project_id,
                    text,
                    added_by: actor.id,
                    author_name: actor.name.clone(),
                    author_role: actor.role,
                },
            )
            .await?;
            state.publish(
                ChangeEvent::inserted(ChangeTable::GlobalComments, comment.id)
                    .in_project(project_id)
                    .by(actor.id),
            );
            PostedComment::Global(comment)
        }
    };

    Ok((StatusCode::CREATED, Json(DataResponse::new(posted))))
}

/// GET /api/v1/projects/{id}/comments
pub async fn list_global(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<GlobalComment>>>> {
    find_visible_project(&state.pool, &auth.actor(), project_id).await?;
    let comments = GlobalCommentRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse::new(comments)))
}

/// GET /api/v1/projects/{id}/comment-tasks
pub async fn list_tasks_by_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CommentTask>>>> {
    find_visible_project(&state.pool, &auth.actor(), project_id).await?;
    let tasks = CommentTaskRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse::new(tasks)))
}

/// GET /api/v1/comment-tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<CommentTask>>>> {
    let actor = auth.actor();
    let projects = ProjectRepo::list(&state.pool).await?;
    let visible = VisibleProjects::compute(&actor, &projects);
    let tasks = visible.retain(CommentTaskRepo::list(&state.pool).await?, |t| t.project_id);
    Ok(Json(DataResponse::new(tasks)))
}

/// PATCH /api/v1/comment-tasks/{id}/status
pub async fn update_task_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CommentTaskStatusRequest>,
) -> AppResult<Json<DataResponse<CommentTask>>> {
    let actor = auth.actor();
    ensure_can_change_comment_task_status(&actor)?;

    let task = CommentTaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("CommentTask", id))?;
    find_visible_project(&state.pool, &actor, task.project_id).await?;

    let task = CommentTaskRepo::update_status(&state.pool, id, input.status)
        .await?
        .ok_or_else(|| AppError::not_found("CommentTask", id))?;

    state.publish(
        ChangeEvent::updated(ChangeTable::CommentTasks, id)
            .in_project(task.project_id)
            .by(actor.id),
    );
    Ok(Json(DataResponse::new(task)))
}

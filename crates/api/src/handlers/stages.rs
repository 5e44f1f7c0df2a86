//! Handlers for the `/stages` resource.
//!
//! Stages only exist as the five rows created with their project; they can
//! be updated and signed off but never created or deleted here.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use xeetrack_core::brochure::ApprovalDecision;
use xeetrack_core::stages::{ensure_can_decide_stage, ensure_can_update_stage};
use xeetrack_core::status::{validate_percentage, ApprovalStatus, WorkStatus};
use xeetrack_core::types::{Actor, DbId};
use xeetrack_db::models::comment::{CommentTask, CreateCommentTask};
use xeetrack_db::models::project::Project;
use xeetrack_db::models::stage::{Stage, UpdateStage};
use xeetrack_db::repositories::{CommentTaskRepo, StageRepo};
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::error::{AppError, AppResult};
use crate::handlers::projects::find_visible_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /stages/{id}/decision`.
#[derive(Debug, Deserialize)]
pub struct StageDecisionRequest {
    pub decision: ApprovalDecision,
    pub comment: Option<String>,
}

/// A stage decision, with the comment-task raised from its comment.
#[derive(Debug, Serialize)]
pub struct StageDecisionResponse {
    pub stage: Stage,
    pub comment_task: Option<CommentTask>,
}

async fn find_stage_in_visible_project(
    state: &AppState,
    actor: &Actor,
    id: DbId,
) -> AppResult<(Stage, Project)> {
    let stage = StageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Stage", id))?;
    let project = find_visible_project(&state.pool, actor, stage.project_id).await?;
    Ok((stage, project))
}

/// PUT /api/v1/stages/{id}
///
/// Notes and progress, by staff on the project.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStage>,
) -> AppResult<Json<DataResponse<Stage>>> {
    let actor = auth.actor();
    let (_, project) = find_stage_in_visible_project(&state, &actor, id).await?;
    ensure_can_update_stage(&actor, &project)?;
    if let Some(progress) = input.progress_percentage {
        validate_percentage(progress)?;
    }

    let stage = StageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Stage", id))?;

    state.publish(
        ChangeEvent::updated(ChangeTable::Stages, id)
            .in_project(project.id)
            .by(actor.id),
    );
    Ok(Json(DataResponse::new(stage)))
}

/// POST /api/v1/stages/{id}/decision
///
/// The project's client (or a manager) approves or rejects a stage. A
/// non-blank comment is raised as an open comment-task on the stage so the
/// agency picks it up.
pub async fn decide(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<StageDecisionRequest>,
) -> AppResult<Json<DataResponse<StageDecisionResponse>>> {
    let actor = auth.actor();
    let (_, project) = find_stage_in_visible_project(&state, &actor, id).await?;
    ensure_can_decide_stage(&actor, &project)?;

    let status = match input.decision {
        ApprovalDecision::Approve => ApprovalStatus::Approved,
        ApprovalDecision::Reject => ApprovalStatus::Rejected,
    };
    let stage = StageRepo::set_approval(&state.pool, id, status)
        .await?
        .ok_or_else(|| AppError::not_found("Stage", id))?;

    tracing::info!(stage_id = id, project_id = project.id, actor_id = actor.id, status = %status, "Stage decided");
    state.publish(
        ChangeEvent::updated(ChangeTable::Stages, id)
            .in_project(project.id)
            .by(actor.id),
    );

    let comment = input
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let comment_task = match comment {
        Some(text) => {
            let task = CommentTaskRepo::create(
                &state.pool,
                &CreateCommentTask {
                    project_id: project.id,
                    stage_id: Some(id),
                    text: text.to_string(),
                    added_by: actor.id,
                    author_name: actor.name.clone(),
                    author_role: actor.role,
                    status: WorkStatus::Open,
                    assigned_to: None,
                    deadline: None,
                },
            )
            .await?;
            state.publish(
                ChangeEvent::inserted(ChangeTable::CommentTasks, task.id)
                    .in_project(project.id)
                    .by(actor.id),
            );
            Some(task)
        }
        None => None,
    };

    Ok(Json(DataResponse::new(StageDecisionResponse {
        stage,
        comment_task,
    })))
}

//! Review notes on brochure pages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use xeetrack_core::comments::clean_comment_text;
use xeetrack_core::status::PageActionType;
use xeetrack_core::types::DbId;
use xeetrack_db::models::brochure::{CreatePageComment, PageComment};
use xeetrack_db::repositories::PageCommentRepo;
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::error::{AppError, AppResult};
use crate::handlers::pages::find_visible_page;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddPageCommentRequest {
    #[serde(default)]
    pub text: String,
}

/// GET /api/v1/pages/{id}/comments
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(page_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PageComment>>>> {
    find_visible_page(&state, &auth.actor(), page_id).await?;
    let comments = PageCommentRepo::list_by_page(&state.pool, page_id).await?;
    Ok(Json(DataResponse::new(comments)))
}

/// POST /api/v1/pages/{id}/comments
pub async fn add(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Path(page_id): Path<DbId>,
    Json(input): Json<AddPageCommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PageComment>>)> {
    let actor = auth.actor();
    let text = clean_comment_text(&input.text)?;
    let (page, _) = find_visible_page(&state, &actor, page_id).await?;

    let comment = PageCommentRepo::create(
        &state.pool,
        &CreatePageComment {
            page_id,
            text,
            added_by: actor.id,
            author_name: actor.name.clone(),
            author_role: actor.role,
            action_type: PageActionType::Comment,
        },
    )
    .await?;

    state.publish(
        ChangeEvent::inserted(ChangeTable::PageComments, comment.id)
            .in_brochure(page.brochure_id)
            .by(actor.id),
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(comment))))
}

/// POST /api/v1/page-comments/{id}/done
///
/// Marking an already-done comment is a no-op.
pub async fn mark_done(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PageComment>>> {
    let actor = auth.actor();
    let comment = PageCommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("PageComment", id))?;
    let (page, _) = find_visible_page(&state, &actor, comment.page_id).await?;

    let comment = PageCommentRepo::mark_done(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("PageComment", id))?;

    state.publish(
        ChangeEvent::updated(ChangeTable::PageComments, id)
            .in_brochure(page.brochure_id)
            .by(actor.id),
    );
    Ok(Json(DataResponse::new(comment)))
}

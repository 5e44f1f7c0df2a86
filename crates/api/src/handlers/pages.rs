//! Handlers for brochure pages: content edits, drafts, locking and review.
//!
//! Content is addressed by `(brochure, page_number)` so the editor can save a
//! page that has never been written. Lock and review actions address a page
//! row by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use xeetrack_core::brochure::{
    decide_page, ensure_can_edit_page, next_page_number, resubmit_page, ApprovalDecision,
    ApprovalTransition, PageContent, PageKind, PageLock,
};
use xeetrack_core::error::CoreError;
use xeetrack_core::normalize::normalize_html;
use xeetrack_core::status::PageActionType;
use xeetrack_core::types::{Actor, DbId};
use xeetrack_db::models::brochure::{BrochurePage, BrochureProject, CreatePageComment, PageComment};
use xeetrack_db::repositories::{BrochurePageRepo, BrochureRepo};
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::background::autosave::{Draft, DraftKey};
use crate::error::{AppError, AppResult};
use crate::handlers::brochures::find_visible_brochure;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /brochures/{id}/pages/{number}`.
#[derive(Debug, Deserialize)]
pub struct SavePageRequest {
    pub content: PageContent,
    /// The `version` the editor loaded. When present, a save against a newer
    /// version is refused with 409.
    pub expected_version: Option<i32>,
}

/// Request body for `PUT /brochures/{id}/pages/{number}/draft`.
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub content: PageContent,
}

/// Request body for `POST /pages/{id}/approve` and `/reject`.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    pub comment: Option<String>,
}

/// A page with its navigation title and checklist completion.
#[derive(Debug, Serialize)]
pub struct PageView {
    #[serde(flatten)]
    pub page: BrochurePage,
    pub title: String,
    pub completion_percentage: i32,
}

impl From<BrochurePage> for PageView {
    fn from(page: BrochurePage) -> Self {
        let title = page.kind().map(PageKind::title).unwrap_or_default();
        let completion_percentage = page.content.0.completion();
        Self {
            page,
            title,
            completion_percentage,
        }
    }
}

/// A review action's result: the page and the audit comment it appended.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub page: PageView,
    pub comment: PageComment,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a page by id together with its brochure, checking visibility.
pub(crate) async fn find_visible_page(
    state: &AppState,
    actor: &Actor,
    page_id: DbId,
) -> AppResult<(BrochurePage, BrochureProject)> {
    let page = BrochurePageRepo::find_by_id(&state.pool, page_id)
        .await?
        .ok_or_else(|| AppError::not_found("BrochurePage", page_id))?;
    let brochure = find_visible_brochure(&state.pool, actor, page.brochure_id).await?;
    Ok((page, brochure))
}

/// Check an edit of `(brochure, page_number)` against the current lock.
async fn ensure_can_write(
    state: &AppState,
    actor: &Actor,
    brochure: &BrochureProject,
    page_number: i32,
) -> AppResult<Option<BrochurePage>> {
    let existing = BrochurePageRepo::find_by_number(&state.pool, brochure.id, page_number).await?;
    let lock = existing
        .as_ref()
        .map(BrochurePage::lock_state)
        .unwrap_or_else(PageLock::unlocked);
    ensure_can_edit_page(actor, brochure.client_id, &lock)?;
    Ok(existing)
}

/// Validate content against its page and apply body normalization.
fn prepare_content(state: &AppState, kind: PageKind, mut content: PageContent) -> AppResult<PageContent> {
    content.ensure_matches(kind)?;
    if state.config.normalize_reversed_words {
        if let PageContent::Freeform(page) = &mut content {
            page.body_content = page.body_content.as_deref().map(normalize_html);
        }
    }
    Ok(content)
}

/// Persist an approval-axis transition with its audit comment.
async fn apply_transition(
    state: &AppState,
    actor: &Actor,
    page: &BrochurePage,
    transition: ApprovalTransition,
) -> AppResult<ReviewResponse> {
    let audit = CreatePageComment {
        page_id: page.id,
        text: transition.audit_text,
        added_by: actor.id,
        author_name: actor.name.clone(),
        author_role: actor.role,
        action_type: PageActionType::Approval,
    };

    let (updated, comment) = BrochurePageRepo::transition_approval(
        &state.pool,
        page.id,
        page.approval_status,
        transition.new_status,
        &audit,
    )
    .await?
    .ok_or_else(|| {
        CoreError::Conflict("Page approval changed concurrently; reload and retry".into())
    })?;

    BrochureRepo::touch(&state.pool, page.brochure_id).await?;

    tracing::info!(
        page_id = page.id,
        brochure_id = page.brochure_id,
        actor_id = actor.id,
        from = %page.approval_status,
        to = %updated.approval_status,
        "Page approval changed"
    );
    state.publish(
        ChangeEvent::updated(ChangeTable::BrochurePages, page.id)
            .in_brochure(page.brochure_id)
            .by(actor.id),
    );
    state.publish(
        ChangeEvent::inserted(ChangeTable::PageComments, comment.id)
            .in_brochure(page.brochure_id)
            .by(actor.id),
    );

    Ok(ReviewResponse {
        page: PageView::from(updated),
        comment,
    })
}

async fn set_lock(
    state: &AppState,
    actor: &Actor,
    page: &BrochurePage,
    lock: PageLock,
) -> AppResult<Json<DataResponse<PageView>>> {
    let updated = BrochurePageRepo::set_lock(&state.pool, page.id, &lock)
        .await?
        .ok_or_else(|| AppError::not_found("BrochurePage", page.id))?;

    tracing::info!(
        page_id = page.id,
        actor_id = actor.id,
        locked = updated.is_locked,
        "Page lock changed"
    );
    state.publish(
        ChangeEvent::updated(ChangeTable::BrochurePages, page.id)
            .in_brochure(page.brochure_id)
            .by(actor.id),
    );
    Ok(Json(DataResponse::new(PageView::from(updated))))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/brochures/{id}/pages
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(brochure_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PageView>>>> {
    find_visible_brochure(&state.pool, &auth.actor(), brochure_id).await?;
    let pages = BrochurePageRepo::list_by_brochure(&state.pool, brochure_id)
        .await?
        .into_iter()
        .map(PageView::from)
        .collect();
    Ok(Json(DataResponse::new(pages)))
}

/// GET /api/v1/brochures/{id}/pages/{number}
pub async fn get_by_number(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((brochure_id, page_number)): Path<(DbId, i32)>,
) -> AppResult<Json<DataResponse<PageView>>> {
    find_visible_brochure(&state.pool, &auth.actor(), brochure_id).await?;
    let page = BrochurePageRepo::find_by_number(&state.pool, brochure_id, page_number)
        .await?
        .ok_or_else(|| AppError::not_found("BrochurePage", page_number.into()))?;
    Ok(Json(DataResponse::new(PageView::from(page))))
}

/// POST /api/v1/brochures/{id}/pages
///
/// Appends an empty page after the highest existing page number.
pub async fn append(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(brochure_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<PageView>>)> {
    let actor = auth.actor();
    let brochure = find_visible_brochure(&state.pool, &actor, brochure_id).await?;
    ensure_can_edit_page(&actor, brochure.client_id, &PageLock::unlocked())?;

    let numbers: Vec<i32> = BrochurePageRepo::list_by_brochure(&state.pool, brochure_id)
        .await?
        .iter()
        .map(|p| p.page_number)
        .collect();
    let page_number = next_page_number(&numbers);
    let content = PageContent::empty_for(PageKind::from_page_number(page_number)?);

    let page = BrochurePageRepo::create(&state.pool, brochure_id, page_number, &content).await?;
    BrochureRepo::touch(&state.pool, brochure_id).await?;

    tracing::info!(page_id = page.id, brochure_id, page_number, "Page added");
    state.publish(
        ChangeEvent::inserted(ChangeTable::BrochurePages, page.id)
            .in_brochure(brochure_id)
            .by(actor.id),
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(PageView::from(page)))))
}

/// PUT /api/v1/brochures/{id}/pages/{number}
///
/// Creates the page on first save. Clients cannot write locked pages; staff
/// can. A stale `expected_version` gives 409.
pub async fn save(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((brochure_id, page_number)): Path<(DbId, i32)>,
    Json(input): Json<SavePageRequest>,
) -> AppResult<Json<DataResponse<PageView>>> {
    let actor = auth.actor();
    let brochure = find_visible_brochure(&state.pool, &actor, brochure_id).await?;
    let kind = PageKind::from_page_number(page_number)?;
    let existing = ensure_can_write(&state, &actor, &brochure, page_number).await?;
    let content = prepare_content(&state, kind, input.content)?;

    let saved = BrochurePageRepo::save_content(
        &state.pool,
        brochure_id,
        page_number,
        &content,
        input.expected_version,
        actor.is_staff(),
    )
    .await?;

    let page = match saved {
        Some(page) => page,
        None => {
            // Refused by the guard: either a lock landed or the version moved.
            ensure_can_write(&state, &actor, &brochure, page_number).await?;
            return Err(AppError::Core(CoreError::Conflict(
                "Page was changed by someone else; reload and retry".into(),
            )));
        }
    };

    BrochureRepo::touch(&state.pool, brochure_id).await?;
    let discarded = state
        .autosave
        .discard(&DraftKey {
            brochure_id,
            page_number,
        })
        .await;

    tracing::info!(
        page_id = page.id,
        brochure_id,
        page_number,
        version = page.version,
        discarded_draft = discarded,
        actor_id = actor.id,
        "Page saved"
    );
    let event = match existing {
        Some(_) => ChangeEvent::updated(ChangeTable::BrochurePages, page.id),
        None => ChangeEvent::inserted(ChangeTable::BrochurePages, page.id),
    };
    state.publish(event.in_brochure(brochure_id).by(actor.id));

    Ok(Json(DataResponse::new(PageView::from(page))))
}

/// PUT /api/v1/brochures/{id}/pages/{number}/draft
///
/// Queues content for a debounced save and answers 202 straight away.
/// Permissions are checked now; the lock and the page version are checked
/// again when the draft is written.
pub async fn save_draft(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((brochure_id, page_number)): Path<(DbId, i32)>,
    Json(input): Json<DraftRequest>,
) -> AppResult<StatusCode> {
    let actor = auth.actor();
    let brochure = find_visible_brochure(&state.pool, &actor, brochure_id).await?;
    let kind = PageKind::from_page_number(page_number)?;
    let existing = ensure_can_write(&state, &actor, &brochure, page_number).await?;
    let content = prepare_content(&state, kind, input.content)?;

    state
        .autosave
        .submit(
            DraftKey {
                brochure_id,
                page_number,
            },
            Draft {
                actor,
                content,
                base_version: existing.map(|p| p.version),
            },
        )
        .await;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/pages/{id}/lock
pub async fn lock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(page_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PageView>>> {
    let actor = auth.actor();
    let lock = PageLock::lock(&actor, Utc::now())?;
    let (page, _) = find_visible_page(&state, &actor, page_id).await?;
    set_lock(&state, &actor, &page, lock).await
}

/// POST /api/v1/pages/{id}/unlock
pub async fn unlock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(page_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PageView>>> {
    let actor = auth.actor();
    let lock = PageLock::unlock(&actor)?;
    let (page, _) = find_visible_page(&state, &actor, page_id).await?;
    set_lock(&state, &actor, &page, lock).await
}

/// POST /api/v1/pages/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(page_id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<Json<DataResponse<ReviewResponse>>> {
    review(state, auth, page_id, ApprovalDecision::Approve, input).await
}

/// POST /api/v1/pages/{id}/reject
///
/// Requires a comment explaining the requested changes.
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(page_id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<Json<DataResponse<ReviewResponse>>> {
    review(state, auth, page_id, ApprovalDecision::Reject, input).await
}

async fn review(
    state: AppState,
    auth: AuthUser,
    page_id: DbId,
    decision: ApprovalDecision,
    input: ReviewRequest,
) -> AppResult<Json<DataResponse<ReviewResponse>>> {
    let actor = auth.actor();
    let (page, _) = find_visible_page(&state, &actor, page_id).await?;
    let transition = decide_page(
        &actor,
        page.approval_status,
        decision,
        input.comment.as_deref(),
    )?;
    let response = apply_transition(&state, &actor, &page, transition).await?;
    Ok(Json(DataResponse::new(response)))
}

/// POST /api/v1/pages/{id}/resubmit
///
/// Sends a rejected page back to pending.
pub async fn resubmit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(page_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReviewResponse>>> {
    let actor = auth.actor();
    let (page, brochure) = find_visible_page(&state, &actor, page_id).await?;
    let transition = resubmit_page(&actor, brochure.client_id, page.approval_status)?;
    let response = apply_transition(&state, &actor, &page, transition).await?;
    Ok(Json(DataResponse::new(response)))
}

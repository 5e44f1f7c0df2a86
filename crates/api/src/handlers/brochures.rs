//! Handlers for the `/brochures` resource: creation, listing, the staff
//! review queue, and status transitions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use xeetrack_core::brochure::{brochure_completion, check_brochure_transition};
use xeetrack_core::error::CoreError;
use xeetrack_core::progress::completion_percent;
use xeetrack_core::roles::Role;
use xeetrack_core::status::{ApprovalStatus, BrochureStatus};
use xeetrack_core::types::{Actor, DbId};
use xeetrack_core::visibility::can_view_brochure;
use xeetrack_db::models::brochure::BrochureProject;
use xeetrack_db::repositories::{BrochurePageRepo, BrochureRepo, UserRepo};
use xeetrack_db::DbPool;
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::error::{AppError, AppResult};
use crate::handlers::pages::PageView;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /brochures`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBrochureRequest {
    /// Required when a manager opens a brochure on a client's behalf.
    pub client_id: Option<DbId>,
}

/// Request body for `POST /brochures/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct BrochureStatusRequest {
    pub status: BrochureStatus,
}

/// A brochure with its pages and both progress measures.
#[derive(Debug, Serialize)]
pub struct BrochureDetail {
    #[serde(flatten)]
    pub brochure: BrochureProject,
    pub pages: Vec<PageView>,
    /// Filled checklist items over all pages.
    pub completion_percentage: i32,
    /// Approved pages over all pages.
    pub approval_percentage: i32,
}

/// Fetch a brochure and verify `actor` may see it.
pub(crate) async fn find_visible_brochure(
    pool: &DbPool,
    actor: &Actor,
    id: DbId,
) -> AppResult<BrochureProject> {
    let brochure = BrochureRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("BrochureProject", id))?;

    if !can_view_brochure(actor, brochure.client_id, brochure.status) {
        return Err(AppError::Core(CoreError::forbidden(
            "You do not have access to this brochure",
        )));
    }
    Ok(brochure)
}

/// POST /api/v1/brochures
///
/// Clients open a brochure for themselves; managers name the client.
/// Brochures start in `draft` with no pages.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateBrochureRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BrochureProject>>)> {
    let client_id = match auth.role {
        Role::Client => match input.client_id {
            Some(id) if id != auth.user_id => {
                return Err(AppError::Core(CoreError::forbidden(
                    "Clients may only create their own brochures",
                )))
            }
            _ => auth.user_id,
        },
        Role::Manager => {
            let id = input.client_id.ok_or_else(|| {
                CoreError::validation("client_id is required when a manager creates a brochure")
            })?;
            match UserRepo::find_by_id(&state.pool, id).await? {
                Some(p) if p.role == Role::Client => id,
                _ => {
                    return Err(AppError::Core(CoreError::Validation(format!(
                        "User {id} is not a client"
                    ))))
                }
            }
        }
        Role::Employee => {
            return Err(AppError::Core(CoreError::forbidden(
                "Employees cannot create brochures",
            )))
        }
    };

    let brochure = BrochureRepo::create(&state.pool, client_id).await?;

    tracing::info!(brochure_id = brochure.id, client_id, "Brochure created");
    state.publish(
        ChangeEvent::inserted(ChangeTable::BrochureProjects, brochure.id)
            .in_brochure(brochure.id)
            .by(auth.user_id),
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(brochure))))
}

/// GET /api/v1/brochures
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<BrochureProject>>>> {
    let actor = auth.actor();
    let brochures = BrochureRepo::list(&state.pool)
        .await?
        .into_iter()
        .filter(|b| can_view_brochure(&actor, b.client_id, b.status))
        .collect();
    Ok(Json(DataResponse::new(brochures)))
}

/// GET /api/v1/brochures/review-queue
///
/// Brochures submitted for design or being designed.
pub async fn review_queue(
    State(state): State<AppState>,
    RequireStaff(_auth): RequireStaff,
) -> AppResult<Json<DataResponse<Vec<BrochureProject>>>> {
    let brochures = BrochureRepo::list_for_review(&state.pool).await?;
    Ok(Json(DataResponse::new(brochures)))
}

/// GET /api/v1/brochures/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BrochureDetail>>> {
    let brochure = find_visible_brochure(&state.pool, &auth.actor(), id).await?;
    let pages = BrochurePageRepo::list_by_brochure(&state.pool, id).await?;

    let completion_percentage = brochure_completion(pages.iter().map(|p| &p.content.0));
    let approved = pages
        .iter()
        .filter(|p| p.approval_status == ApprovalStatus::Approved)
        .count();
    let approval_percentage = completion_percent(approved as u32, pages.len() as u32);

    Ok(Json(DataResponse::new(BrochureDetail {
        brochure,
        pages: pages.into_iter().map(PageView::from).collect(),
        completion_percentage,
        approval_percentage,
    })))
}

/// POST /api/v1/brochures/{id}/status
///
/// ```text
/// draft -> ready_for_design      owning client or manager
/// ready_for_design -> in_design  staff
/// in_design -> completed         manager
/// ```
pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<BrochureStatusRequest>,
) -> AppResult<Json<DataResponse<BrochureProject>>> {
    let actor = auth.actor();
    let brochure = find_visible_brochure(&state.pool, &actor, id).await?;
    check_brochure_transition(&actor, brochure.client_id, brochure.status, input.status)?;

    let updated = BrochureRepo::transition(&state.pool, id, brochure.status, input.status)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict("Brochure status changed concurrently; reload and retry".into())
        })?;

    tracing::info!(
        brochure_id = id,
        actor_id = actor.id,
        from = %brochure.status,
        to = %updated.status,
        "Brochure status changed"
    );
    state.publish(
        ChangeEvent::updated(ChangeTable::BrochureProjects, id)
            .in_brochure(id)
            .by(actor.id),
    );
    Ok(Json(DataResponse::new(updated)))
}

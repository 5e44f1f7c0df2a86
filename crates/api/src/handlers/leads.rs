//! Handlers for the `/leads` sales pipeline. Managers only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use xeetrack_core::error::CoreError;
use xeetrack_core::types::DbId;
use xeetrack_db::models::lead::{CreateLead, Lead, LeadPipeline, UpdateLead};
use xeetrack_db::repositories::LeadRepo;
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::validation("Lead name is required")));
    }
    Ok(name.to_string())
}

fn ensure_amount(amount: f64) -> AppResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::Core(CoreError::validation(
            "Estimated amount must be zero or more",
        )));
    }
    Ok(())
}

/// POST /api/v1/leads
pub async fn create(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Json(mut input): Json<CreateLead>,
) -> AppResult<(StatusCode, Json<DataResponse<Lead>>)> {
    input.name = clean_name(&input.name)?;
    ensure_amount(input.estimated_amount)?;

    let lead = LeadRepo::create(&state.pool, &input).await?;

    tracing::info!(lead_id = lead.id, created_by = auth.user_id, "Lead created");
    state.publish(ChangeEvent::inserted(ChangeTable::Leads, lead.id).by(auth.user_id));
    Ok((StatusCode::CREATED, Json(DataResponse::new(lead))))
}

/// GET /api/v1/leads
pub async fn list(
    State(state): State<AppState>,
    RequireManager(_auth): RequireManager,
) -> AppResult<Json<DataResponse<Vec<Lead>>>> {
    let leads = LeadRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(leads)))
}

/// GET /api/v1/leads/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireManager(_auth): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Lead>>> {
    let lead = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Lead", id))?;
    Ok(Json(DataResponse::new(lead)))
}

/// PUT /api/v1/leads/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateLead>,
) -> AppResult<Json<DataResponse<Lead>>> {
    if let Some(name) = input.name.as_mut() {
        *name = clean_name(name)?;
    }
    if let Some(amount) = input.estimated_amount {
        ensure_amount(amount)?;
    }

    let lead = LeadRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Lead", id))?;

    state.publish(ChangeEvent::updated(ChangeTable::Leads, id).by(auth.user_id));
    Ok(Json(DataResponse::new(lead)))
}

/// DELETE /api/v1/leads/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !LeadRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Lead", id));
    }

    tracing::info!(lead_id = id, deleted_by = auth.user_id, "Lead deleted");
    state.publish(ChangeEvent::deleted(ChangeTable::Leads, id).by(auth.user_id));
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/leads/pipeline
pub async fn pipeline(
    State(state): State<AppState>,
    RequireManager(_auth): RequireManager,
) -> AppResult<Json<DataResponse<LeadPipeline>>> {
    let pipeline = LeadRepo::pipeline(&state.pool).await?;
    Ok(Json(DataResponse::new(pipeline)))
}

//! Handlers for the `/users` resource.
//!
//! Managers create employee and client accounts; there is no path that
//! changes a role or creates another manager.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use xeetrack_core::error::CoreError;
use xeetrack_core::roles::Role;
use xeetrack_core::types::DbId;
use xeetrack_db::models::user::{CreateProfile, ProfileResponse};
use xeetrack_db::repositories::{SessionRepo, UserRepo};
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireManager, RequireStaff};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProfileResponse>>)> {
    input.validate()?;
    if !input.role.is_creatable() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Accounts with role '{}' cannot be created",
            input.role
        ))));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let profile = UserRepo::create(
        &state.pool,
        &CreateProfile {
            full_name: input.full_name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            role: input.role,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = profile.id, role = %profile.role, created_by = auth.user_id, "Account created");
    state.publish(ChangeEvent::inserted(ChangeTable::Profiles, profile.id).by(auth.user_id));

    Ok((StatusCode::CREATED, Json(DataResponse::new(profile.into()))))
}

/// GET /api/v1/users?role=employee
///
/// Staff use this to pick assignees and clients.
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(_auth): RequireStaff,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<DataResponse<Vec<ProfileResponse>>>> {
    let users = UserRepo::list(&state.pool, query.role).await?;
    Ok(Json(DataResponse::new(
        users.into_iter().map(ProfileResponse::from).collect(),
    )))
}

/// POST /api/v1/users/{id}/deactivate
///
/// Blocks future logins and revokes the user's refresh sessions.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == auth.user_id {
        return Err(AppError::Core(CoreError::validation(
            "You cannot deactivate your own account",
        )));
    }
    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::not_found("Profile", id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, deactivated_by = auth.user_id, "Account deactivated");
    state.publish(ChangeEvent::updated(ChangeTable::Profiles, id).by(auth.user_id));
    Ok(StatusCode::NO_CONTENT)
}

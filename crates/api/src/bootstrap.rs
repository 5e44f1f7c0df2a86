//! First-run account creation.
//!
//! Manager accounts cannot be created through the API, so a fresh database
//! gets its first manager from `BOOTSTRAP_MANAGER_*` configuration.

use xeetrack_core::roles::Role;
use xeetrack_db::models::user::{CreateProfile, Profile};
use xeetrack_db::repositories::UserRepo;
use xeetrack_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapManager;
use crate::error::{AppError, AppResult};

/// Create the configured manager unless an active manager already exists.
///
/// Returns the new profile, or `None` when nothing was created.
pub async fn ensure_manager(
    pool: &DbPool,
    bootstrap: Option<&BootstrapManager>,
) -> AppResult<Option<Profile>> {
    if UserRepo::any_with_role(pool, Role::Manager).await? {
        return Ok(None);
    }

    let Some(bootstrap) = bootstrap else {
        tracing::warn!("No manager account exists and BOOTSTRAP_MANAGER_* is not set");
        return Ok(None);
    };

    validate_password_strength(&bootstrap.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;
    let password_hash = hash_password(&bootstrap.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let profile = UserRepo::create(
        pool,
        &CreateProfile {
            full_name: bootstrap.name.clone(),
            email: bootstrap.email.trim().to_lowercase(),
            role: Role::Manager,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = profile.id, email = %profile.email, "Bootstrap manager created");
    Ok(Some(profile))
}

//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET  /                  -> list (staff)
/// POST /                  -> create (manager)
/// POST /{id}/deactivate   -> deactivate (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/{id}/deactivate", post(users::deactivate))
}

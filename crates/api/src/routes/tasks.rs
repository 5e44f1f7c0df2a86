//! Route definitions for `/tasks` and `/comment-tasks`.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::{comments, tasks};
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET          /               -> list
/// PUT, DELETE  /{id}           -> update, delete
/// PATCH        /{id}/status    -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list))
        .route("/{id}", put(tasks::update).delete(tasks::delete))
        .route("/{id}/status", patch(tasks::update_status))
}

/// Routes mounted at `/comment-tasks`.
///
/// ```text
/// GET    /               -> list_tasks
/// PATCH  /{id}/status    -> update_task_status
/// ```
pub fn comment_task_router() -> Router<AppState> {
    Router::new()
        .route("/", get(comments::list_tasks))
        .route("/{id}/status", patch(comments::update_task_status))
}

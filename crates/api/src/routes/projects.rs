//! Route definitions for the `/projects` resource and its sub-resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, files, projects, tasks};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET, POST  /                       -> list, create
/// GET, PUT   /{id}                   -> get_by_id, update
/// GET        /{id}/stages            -> list_stages
/// GET, POST  /{id}/tasks             -> tasks::list_by_project, tasks::create
/// GET, POST  /{id}/comments          -> comments::list_global, comments::post
/// GET        /{id}/comment-tasks     -> comments::list_tasks_by_project
/// GET, POST  /{id}/files             -> files::list_by_project, files::upload
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/{id}", get(projects::get_by_id).put(projects::update))
        .route("/{id}/stages", get(projects::list_stages))
        .route("/{id}/tasks", get(tasks::list_by_project).post(tasks::create))
        .route("/{id}/comments", get(comments::list_global).post(comments::post))
        .route("/{id}/comment-tasks", get(comments::list_tasks_by_project))
        .route("/{id}/files", get(files::list_by_project).post(files::upload))
}

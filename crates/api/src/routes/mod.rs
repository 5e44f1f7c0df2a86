pub mod auth;
pub mod brochures;
pub mod files;
pub mod health;
pub mod leads;
pub mod projects;
pub mod stages;
pub mod tasks;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws?token=...                                    WebSocket change feed
///
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current profile
///
/// /users                                           list (staff), create (manager)
/// /users/{id}/deactivate                           deactivate (manager)
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update
/// /projects/{id}/stages                            the five stages
/// /projects/{id}/tasks                             list, create
/// /projects/{id}/comments                          discussion, comment composer
/// /projects/{id}/comment-tasks                     client comment-tasks
/// /projects/{id}/files                             list, upload metadata
///
/// /stages/{id}                                     update notes/progress
/// /stages/{id}/decision                            approve / reject
///
/// /tasks                                           visible tasks
/// /tasks/{id}                                      update, delete
/// /tasks/{id}/status                               status change
///
/// /comment-tasks                                   visible comment-tasks
/// /comment-tasks/{id}/status                       status change (staff)
///
/// /brochures                                       list, create
/// /brochures/review-queue                          submitted brochures (staff)
/// /brochures/{id}                                  detail with completion
/// /brochures/{id}/status                           lifecycle transition
/// /brochures/{id}/report                           feedback report (.txt)
/// /brochures/{id}/pages                            list, append
/// /brochures/{id}/pages/{number}                   get, save
/// /brochures/{id}/pages/{number}/draft             debounced autosave
///
/// /pages/{id}/lock | unlock                        page lock (staff)
/// /pages/{id}/approve | reject | resubmit          approval axis
/// /pages/{id}/comments                             list, add (staff)
/// /page-comments/{id}/done                         mark done (staff)
///
/// /files                                           search
/// /files/download                                  bulk download
/// /files/{id}                                      get, update (manager)
/// /files/{id}/archive | restore                    archive flag (manager)
/// /files/{id}/download                             download
/// /files/{id}/history                              per-file history (staff)
/// /download-history                                all visible history (staff)
///
/// /leads                                           list, create (manager)
/// /leads/pipeline                                  pipeline totals
/// /leads/{id}                                      get, update, delete
///
/// /dashboard                                       role-aware summary
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket change feed.
        .route("/ws", get(ws::ws_handler))
        // Authentication routes (login, refresh, logout, me).
        .nest("/auth", auth::router())
        // Account management.
        .nest("/users", users::router())
        // Projects and their stages, tasks, comments and files.
        .nest("/projects", projects::router())
        .nest("/stages", stages::router())
        .nest("/tasks", tasks::router())
        .nest("/comment-tasks", tasks::comment_task_router())
        // Brochure builder.
        .nest("/brochures", brochures::router())
        .nest("/pages", brochures::page_router())
        .nest("/page-comments", brochures::page_comment_router())
        // Document center.
        .nest("/files", files::router())
        .nest("/download-history", files::history_router())
        // Sales pipeline.
        .nest("/leads", leads::router())
        .route("/dashboard", get(handlers::dashboard::summary))
}

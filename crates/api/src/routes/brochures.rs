//! Route definitions for brochures, their pages and page comments.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{brochures, page_comments, pages, reports};
use crate::state::AppState;

/// Routes mounted at `/brochures`.
///
/// ```text
/// GET, POST  /                          -> list, create
/// GET        /review-queue              -> review_queue (staff)
/// GET        /{id}                      -> get_by_id
/// POST       /{id}/status               -> change_status
/// GET        /{id}/report               -> reports::download
/// GET, POST  /{id}/pages                -> pages::list, pages::append
/// GET, PUT   /{id}/pages/{number}       -> pages::get_by_number, pages::save
/// PUT        /{id}/pages/{number}/draft -> pages::save_draft (202)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(brochures::list).post(brochures::create))
        .route("/review-queue", get(brochures::review_queue))
        .route("/{id}", get(brochures::get_by_id))
        .route("/{id}/status", post(brochures::change_status))
        .route("/{id}/report", get(reports::download))
        .route("/{id}/pages", get(pages::list).post(pages::append))
        .route(
            "/{id}/pages/{number}",
            get(pages::get_by_number).put(pages::save),
        )
        .route("/{id}/pages/{number}/draft", put(pages::save_draft))
}

/// Routes mounted at `/pages`.
///
/// ```text
/// POST       /{id}/lock       -> lock (staff)
/// POST       /{id}/unlock     -> unlock (staff)
/// POST       /{id}/approve    -> approve (manager)
/// POST       /{id}/reject     -> reject (manager, comment required)
/// POST       /{id}/resubmit   -> resubmit
/// GET, POST  /{id}/comments   -> page_comments::list, page_comments::add
/// ```
pub fn page_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/lock", post(pages::lock))
        .route("/{id}/unlock", post(pages::unlock))
        .route("/{id}/approve", post(pages::approve))
        .route("/{id}/reject", post(pages::reject))
        .route("/{id}/resubmit", post(pages::resubmit))
        .route(
            "/{id}/comments",
            get(page_comments::list).post(page_comments::add),
        )
}

/// Routes mounted at `/page-comments`.
///
/// ```text
/// POST /{id}/done -> mark_done (staff)
/// ```
pub fn page_comment_router() -> Router<AppState> {
    Router::new().route("/{id}/done", post(page_comments::mark_done))
}

//! Route definitions for the document center.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// Routes mounted at `/files`.
///
/// ```text
/// GET       /               -> search
/// POST      /download       -> bulk_download
/// GET, PUT  /{id}           -> get_by_id, update (manager)
/// POST      /{id}/archive   -> archive (manager)
/// POST      /{id}/restore   -> restore (manager)
/// POST      /{id}/download  -> download
/// GET       /{id}/history   -> history_by_file (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(files::search))
        .route("/download", post(files::bulk_download))
        .route("/{id}", get(files::get_by_id).put(files::update))
        .route("/{id}/archive", post(files::archive))
        .route("/{id}/restore", post(files::restore))
        .route("/{id}/download", post(files::download))
        .route("/{id}/history", get(files::history_by_file))
}

/// Routes mounted at `/download-history`.
///
/// ```text
/// GET / -> history (staff)
/// ```
pub fn history_router() -> Router<AppState> {
    Router::new().route("/", get(files::history))
}

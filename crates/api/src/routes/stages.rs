//! Route definitions for the `/stages` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::stages;
use crate::state::AppState;

/// Routes mounted at `/stages`.
///
/// ```text
/// PUT  /{id}            -> update
/// POST /{id}/decision   -> decide
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(stages::update))
        .route("/{id}/decision", post(stages::decide))
}

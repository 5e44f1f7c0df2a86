//! Route definitions for the `/leads` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Routes mounted at `/leads`. Manager only.
///
/// ```text
/// GET, POST          /           -> list, create
/// GET                /pipeline   -> pipeline
/// GET, PUT, DELETE   /{id}       -> get_by_id, update, delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leads::list).post(leads::create))
        .route("/pipeline", get(leads::pipeline))
        .route(
            "/{id}",
            get(leads::get_by_id).put(leads::update).delete(leads::delete),
        )
}

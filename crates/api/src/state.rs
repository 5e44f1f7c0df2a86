use std::sync::Arc;

use crate::background::autosave::Autosaver;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or is already a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: xeetrack_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (change-feed subscribers).
    pub ws_manager: Arc<WsManager>,
    /// Every mutation publishes a [`ChangeEvent`](xeetrack_events::ChangeEvent) here.
    pub event_bus: Arc<xeetrack_events::EventBus>,
    /// Debounced writer for brochure page drafts.
    pub autosave: Arc<Autosaver>,
}

impl AppState {
    /// Publish a change to every subscriber of the bus.
    pub fn publish(&self, event: xeetrack_events::ChangeEvent) {
        self.event_bus.publish(event);
    }
}

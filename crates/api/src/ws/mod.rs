//! WebSocket change feed.
//!
//! Connection management, heartbeat, and the HTTP upgrade handler mounted at
//! `/api/v1/ws`.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::{WsConnection, WsManager};

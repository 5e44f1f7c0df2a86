//! XeeTrack change feed.
//!
//! Every mutation in the API publishes a [`ChangeEvent`] on the [`EventBus`].
//! Subscribers (the WebSocket change feed) forward them to connected clients,
//! which reload the affected collection.

pub mod bus;

pub use bus::{ChangeAction, ChangeEvent, ChangeTable, EventBus};

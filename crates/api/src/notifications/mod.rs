//! Delivery of bus events to connected clients.

pub mod change_feed;

pub use change_feed::ChangeFeed;

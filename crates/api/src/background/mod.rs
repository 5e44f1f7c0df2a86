//! Background tasks.
//!
//! - [`autosave`] -- debounced brochure draft writer, driven by requests.
//! - [`session_cleanup`] -- periodic purge of expired refresh sessions,
//!   stopped through a [`CancellationToken`](tokio_util::sync::CancellationToken).

pub mod autosave;
pub mod session_cleanup;

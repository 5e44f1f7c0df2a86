//! Request handlers.
//!
//! Each submodule owns one resource. Handlers extract the caller, load rows
//! through the `xeetrack_db` repositories, check the `xeetrack_core` rules,
//! and publish a [`ChangeEvent`](xeetrack_events::ChangeEvent) for every
//! mutation.

pub mod auth;
pub mod brochures;
pub mod comments;
pub mod dashboard;
pub mod files;
pub mod leads;
pub mod page_comments;
pub mod pages;
pub mod projects;
pub mod reports;
pub mod stages;
pub mod tasks;
pub mod users;

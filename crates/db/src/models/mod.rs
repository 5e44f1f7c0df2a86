//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches
//!
//! Text-backed enum columns decode through `TryFrom<String>` on the
//! `xeetrack-core` enums, so an unexpected value surfaces as a decode error
//! rather than a silently wrong variant.

pub mod brochure;
pub mod comment;
pub mod file;
pub mod lead;
pub mod project;
pub mod session;
pub mod stage;
pub mod task;
pub mod user;

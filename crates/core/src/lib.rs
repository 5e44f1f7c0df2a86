pub mod brochure;
pub mod comments;
pub mod error;
pub mod files;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod roles;
pub mod stages;
pub mod status;
pub mod tasks;
pub mod types;
pub mod visibility;

//! `storywatch-core` -- shared domain types for the stale-acceptance job.
//!
//! Zero internal deps: entities decoded from the tracking and chat
//! platforms, the pure filter/join pipeline, and message formatting.

pub mod constants;
pub mod error;
pub mod filters;
pub mod format;
pub mod models;
pub mod types;

pub use error::CoreError;
pub use models::{ChatUser, Member, Project, Story, TrackingUser, Workflow, WorkflowState};

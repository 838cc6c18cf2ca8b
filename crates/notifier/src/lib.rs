//! `storywatch-notifier` library crate.
//!
//! Wires the Clubhouse and Slack clients through the filter pipeline and
//! sends each allowlisted requester a reminder about stories stuck in
//! acceptance. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod notify;

pub use config::{JobConfig, Secrets};
pub use error::JobError;
pub use job::{RunReport, StaleStoryJob};
pub use notify::{notify_stale_stories, DeliveryFailure, DeliveryFailures, NotifySummary};

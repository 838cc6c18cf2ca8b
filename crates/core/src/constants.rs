//! Fixed job constants.
//!
//! Changing any of these requires a code change and a redeploy; they are
//! not read from the environment.

use crate::types::EntityId;

/// Tracking-platform team whose stories are watched ("Product").
pub const TEAM_ID: EntityId = 5285;

/// Hours a story must sit in acceptance before its requester is pinged.
pub const STALE_THRESHOLD_HOURS: i64 = 18;

/// Display name the chat message is posted under.
pub const BOT_USERNAME: &str = "Clubhouse Notifier";

/// Workflow state the job watches, matched by exact name.
pub const ACCEPTANCE_STATE_NAME: &str = "In Acceptance";

/// Story links are this prefix followed by the numeric story id.
pub const STORY_URL_BASE: &str = "https://app.clubhouse.io/policygenius/story/";

/// Email addresses whose stories are monitored. Everyone else is ignored.
pub const ALLOWLISTED_EMAILS: &[&str] = &[
    "stephen.meriwether@policygenius.com",
    "adam.chadroff@policygenius.com",
    "jason.fromm@policygenius.com",
];

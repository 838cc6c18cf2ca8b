//! Entities decoded from the tracking and chat platforms.
//!
//! Every entity is a read-only snapshot fetched once per run. Field names
//! follow the wire format via `serde` attributes; unknown fields are
//! ignored.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A user that can be joined across platforms by email.
pub trait Member {
    /// Platform-specific user id.
    fn id(&self) -> &str;
    /// Email address, compared byte-for-byte.
    fn email(&self) -> &str;
}

/// Profile block nested inside a tracking-platform member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingProfile {
    #[serde(default)]
    pub email_address: String,
}

/// A member of the tracking platform (`GET members`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingUser {
    pub id: String,
    #[serde(default)]
    pub profile: TrackingProfile,
}

impl TrackingUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            profile: TrackingProfile {
                email_address: email.into(),
            },
        }
    }
}

impl Member for TrackingUser {
    fn id(&self) -> &str {
        &self.id
    }

    fn email(&self) -> &str {
        &self.profile.email_address
    }
}

/// Profile block nested inside a chat-platform user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatProfile {
    /// Absent for bots and some guest accounts.
    #[serde(default)]
    pub email: String,
}

/// A user of the chat platform (`users.list`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: String,
    #[serde(default)]
    pub profile: ChatProfile,
}

impl ChatUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            profile: ChatProfile {
                email: email.into(),
            },
        }
    }
}

impl Member for ChatUser {
    fn id(&self) -> &str {
        &self.id
    }

    fn email(&self) -> &str {
        &self.profile.email
    }
}

// ---------------------------------------------------------------------------
// Projects and workflows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub team_id: EntityId,
}

/// A named stage in a team's workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub id: EntityId,
    pub name: String,
}

/// A team's workflow; `states` keeps the order returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: EntityId,
    pub team_id: EntityId,
    #[serde(default)]
    pub states: Vec<WorkflowState>,
}

// ---------------------------------------------------------------------------
// Stories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "requested_by_id")]
    pub requester_id: String,
    pub workflow_state_id: EntityId,
    /// RFC 3339 timestamp of the last workflow-state change. The API sends
    /// `null` for stories that never moved.
    #[serde(default)]
    pub moved_at: Option<String>,
}

impl Story {
    /// Parse `moved_at` as RFC 3339.
    pub fn moved_at_time(&self) -> Result<Timestamp, CoreError> {
        let raw = self.moved_at.as_deref().ok_or_else(|| {
            CoreError::Validation(format!("story {} has no moved_at", self.id))
        })?;

        chrono::DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&chrono::Utc))
            .map_err(|e| {
                CoreError::Validation(format!(
                    "story {} has unparsable moved_at {raw:?}: {e}",
                    self.id
                ))
            })
    }

    /// Time since the story last moved, or `None` if `moved_at` is unusable.
    pub fn elapsed_since_moved(&self, now: Timestamp) -> Option<chrono::Duration> {
        self.moved_at_time().ok().map(|moved| now - moved)
    }

    /// Web link to the story.
    pub fn url(&self, base: &str) -> String {
        format!("{base}{}", self.id)
    }
}

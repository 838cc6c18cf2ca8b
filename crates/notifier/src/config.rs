//! Job configuration.
//!
//! [`JobConfig`] holds the fixed constants from
//! [`storywatch_core::constants`]; only the API tokens come from the
//! environment, via [`Secrets::from_env`].
//!
//! # Environment variables
//!
//! | Variable              | Required | Description                     |
//! |-----------------------|----------|---------------------------------|
//! | `CLUBHOUSE_API_TOKEN` | yes      | Clubhouse v2 API token          |
//! | `SLACK_API_TOKEN`     | yes      | Slack bot token (`xoxb-...`)    |

use std::fmt;

use storywatch_core::constants;
use storywatch_core::types::EntityId;

use crate::error::JobError;

pub const ENV_CLUBHOUSE_TOKEN: &str = "CLUBHOUSE_API_TOKEN";
pub const ENV_SLACK_TOKEN: &str = "SLACK_API_TOKEN";

// ---------------------------------------------------------------------------
// JobConfig
// ---------------------------------------------------------------------------

/// Values that shape a run. Built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Team whose projects are scanned.
    pub team_id: EntityId,
    /// Stories older than this many hours in acceptance are reported.
    pub stale_threshold_hours: i64,
    /// Sender display name for chat messages.
    pub bot_username: String,
    /// Workflow state name resolved within the team's workflow.
    pub acceptance_state_name: String,
    /// Prefix for story links; the story id is appended.
    pub story_url_base: String,
    /// Emails of users whose stories are monitored.
    pub allowlisted_emails: Vec<String>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            team_id: constants::TEAM_ID,
            stale_threshold_hours: constants::STALE_THRESHOLD_HOURS,
            bot_username: constants::BOT_USERNAME.to_string(),
            acceptance_state_name: constants::ACCEPTANCE_STATE_NAME.to_string(),
            story_url_base: constants::STORY_URL_BASE.to_string(),
            allowlisted_emails: constants::ALLOWLISTED_EMAILS
                .iter()
                .map(|email| email.to_string())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

/// API tokens for both platforms.
#[derive(Clone)]
pub struct Secrets {
    pub clubhouse_token: String,
    pub slack_token: String,
}

impl Secrets {
    /// Read both tokens from the process environment.
    pub fn from_env() -> Result<Self, JobError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read both tokens through `lookup`. Missing or blank values are a
    /// [`JobError::Config`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, JobError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| JobError::Config(format!("{key} environment variable is required")))
        };

        Ok(Self {
            clubhouse_token: require(ENV_CLUBHOUSE_TOKEN)?,
            slack_token: require(ENV_SLACK_TOKEN)?,
        })
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("clubhouse_token", &"<redacted>")
            .field("slack_token", &"<redacted>")
            .finish()
    }
}

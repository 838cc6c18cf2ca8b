use storywatch_clubhouse::ClubhouseError;
use storywatch_core::types::EntityId;
use storywatch_core::CoreError;
use storywatch_slack::SlackError;

use crate::notify::DeliveryFailures;

/// Fatal outcomes of a job run. Any of these aborts the process.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Tracker(#[from] ClubhouseError),

    #[error(transparent)]
    Chat(#[from] SlackError),

    #[error("No {name:?} workflow state for team {team_id}")]
    WorkflowStateNotFound {
        team_id: EntityId,
        name: String,
        source: CoreError,
    },

    #[error(transparent)]
    Delivery(#[from] DeliveryFailures),
}

//! Per-user delivery of stale-story reminders.
//!
//! [`notify_stale_stories`] walks the allowlisted chat users, maps each one
//! to a tracking account by exact email, and sends a single direct message
//! listing that account's stale stories. A failed send is recorded and the
//! loop moves on; all failures are returned together once every recipient
//! has been attempted.

use storywatch_core::format::stale_stories_message;
use storywatch_core::types::Timestamp;
use storywatch_core::{ChatUser, Member, Story, TrackingUser};
use storywatch_slack::{ChatPlatform, SlackError};

use crate::config::JobConfig;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Counts from a notification pass in which every send succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifySummary {
    /// Messages delivered.
    pub sent: usize,
    /// Chat users with no tracking account sharing their email.
    pub skipped_no_account: usize,
    /// Chat users whose tracking account has nothing stale.
    pub skipped_no_stories: usize,
}

/// A single recipient whose message could not be delivered.
#[derive(Debug, thiserror::Error)]
#[error("{recipient_id} ({email}): {source}")]
pub struct DeliveryFailure {
    /// Chat-platform user id the message was addressed to.
    pub recipient_id: String,
    pub email: String,
    pub source: SlackError,
}

/// Every delivery failure from one notification pass, in send order.
#[derive(Debug, thiserror::Error)]
#[error("Failed to notify {} recipient(s): {}", .failures.len(), join_failures(.failures))]
pub struct DeliveryFailures {
    pub failures: Vec<DeliveryFailure>,
}

fn join_failures(failures: &[DeliveryFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// Send each chat user a summary of their stale stories.
///
/// `stories` should already be narrowed to stale, allowlisted stories.
/// Users with no matching tracking account or no stories get no message.
pub async fn notify_stale_stories<C>(
    chat: &C,
    config: &JobConfig,
    stories: &[Story],
    tracking_users: &[TrackingUser],
    chat_users: &[ChatUser],
    now: Timestamp,
) -> Result<NotifySummary, DeliveryFailures>
where
    C: ChatPlatform + ?Sized,
{
    let mut summary = NotifySummary::default();
    let mut failures = Vec::new();

    for chat_user in chat_users {
        let Some(tracking_user) = tracking_users
            .iter()
            .find(|user| user.email() == chat_user.email())
        else {
            tracing::debug!(email = chat_user.email(), "No tracking account for chat user");
            summary.skipped_no_account += 1;
            continue;
        };

        let user_stories: Vec<Story> = stories
            .iter()
            .filter(|story| story.requester_id == tracking_user.id())
            .cloned()
            .collect();

        if user_stories.is_empty() {
            summary.skipped_no_stories += 1;
            continue;
        }

        let text = stale_stories_message(
            &user_stories,
            config.stale_threshold_hours,
            &config.story_url_base,
            now,
        );

        match chat
            .post_direct_message(chat_user.id(), &text, &config.bot_username)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    recipient = chat_user.id(),
                    story_count = user_stories.len(),
                    "Sent stale story reminder"
                );
                summary.sent += 1;
            }
            Err(e) => {
                tracing::error!(recipient = chat_user.id(), error = %e, "Failed to send reminder");
                failures.push(DeliveryFailure {
                    recipient_id: chat_user.id().to_string(),
                    email: chat_user.email().to_string(),
                    source: e,
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(summary)
    } else {
        Err(DeliveryFailures { failures })
    }
}

//! Chat message formatting for stale-story reminders.

use crate::models::Story;
use crate::types::Timestamp;

/// Rendered in place of an elapsed time when `moved_at` cannot be parsed.
const UNKNOWN_ELAPSED: &str = "unknown time";

/// Human-readable elapsed time, e.g. `1d 2h 5m` or `20h 0m`.
///
/// Leading zero units are dropped; minutes are always shown. Negative
/// durations (clock skew) clamp to `0m`.
pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let total_minutes = elapsed.num_minutes().max(0);
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Build the direct message listing one user's stale stories.
///
/// The first line summarises the count and threshold; each story then gets
/// one bullet with a chat-markup link (`<url|name>`) and its elapsed time.
pub fn stale_stories_message(
    stories: &[Story],
    threshold_hours: i64,
    story_url_base: &str,
    now: Timestamp,
) -> String {
    let mut message = format!(
        "You have {} story(s) in acceptance for more than {threshold_hours} hours\n",
        stories.len()
    );

    for story in stories {
        let elapsed = story
            .elapsed_since_moved(now)
            .map(format_elapsed)
            .unwrap_or_else(|| UNKNOWN_ELAPSED.to_string());
        message.push_str(&format!(
            "* <{}|{}> was moved {elapsed} ago\n",
            story.url(story_url_base),
            story.name
        ));
    }

    message
}

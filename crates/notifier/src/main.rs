//! `storywatch-notifier` -- one-shot stale acceptance reminder job.
//!
//! Invoked with no arguments by an external scheduler. Finds Clubhouse
//! stories that have sat "In Acceptance" past the threshold and DMs each
//! allowlisted requester on Slack. Exits non-zero on any fatal error.
//!
//! See [`storywatch_notifier::config`] for the required environment.

use storywatch_clubhouse::ClubhouseClient;
use storywatch_notifier::{logging, JobConfig, Secrets, StaleStoryJob};
use storywatch_slack::SlackClient;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    logging::init_tracing();

    let secrets = Secrets::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let config = JobConfig::default();

    tracing::info!(
        team_id = config.team_id,
        threshold_hours = config.stale_threshold_hours,
        allowlist_size = config.allowlisted_emails.len(),
        "Starting storywatch-notifier",
    );

    let job = StaleStoryJob::new(
        ClubhouseClient::new(secrets.clubhouse_token),
        SlackClient::new(secrets.slack_token),
        config,
    );

    match job.run(chrono::Utc::now()).await {
        Ok(report) => {
            tracing::info!(
                sent = report.notify.sent,
                stale = report.stale,
                "Run complete"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            std::process::exit(1);
        }
    }
}

//! The stale-acceptance job pipeline.
//!
//! [`StaleStoryJob::run`] performs one complete pass: fetch, filter,
//! notify. Every request is awaited before the next is issued. Any fetch
//! failure or a missing acceptance state aborts the run before a single
//! message is sent.

use storywatch_clubhouse::TrackerApi;
use storywatch_core::filters;
use storywatch_core::types::Timestamp;
use storywatch_core::Story;
use storywatch_slack::ChatPlatform;

use crate::config::JobConfig;
use crate::error::JobError;
use crate::notify::{notify_stale_stories, NotifySummary};

/// Stage counts from a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub chat_users: usize,
    pub allowlisted_chat_users: usize,
    pub tracking_users: usize,
    pub allowlisted_tracking_users: usize,
    pub team_projects: usize,
    pub stories: usize,
    pub in_acceptance: usize,
    pub for_allowlisted: usize,
    /// Allowlisted acceptance stories dropped because `moved_at` was
    /// missing or unparsable.
    pub unparsable_moved_at: usize,
    pub stale: usize,
    pub notify: NotifySummary,
}

/// One configured instance of the job.
pub struct StaleStoryJob<T, C> {
    tracker: T,
    chat: C,
    config: JobConfig,
}

impl<T, C> StaleStoryJob<T, C>
where
    T: TrackerApi,
    C: ChatPlatform,
{
    pub fn new(tracker: T, chat: C, config: JobConfig) -> Self {
        Self {
            tracker,
            chat,
            config,
        }
    }

    /// Run the pipeline once, treating `now` as the current time.
    pub async fn run(&self, now: Timestamp) -> Result<RunReport, JobError> {
        let config = &self.config;
        let mut report = RunReport::default();

        let chat_users = self.chat.list_users().await?;
        report.chat_users = chat_users.len();
        tracing::info!(count = report.chat_users, "Found chat users");

        let allowlisted_chat_users =
            filters::users_for_emails(&chat_users, &config.allowlisted_emails);
        report.allowlisted_chat_users = allowlisted_chat_users.len();
        tracing::info!(count = report.allowlisted_chat_users, "Found allowlisted chat users");

        let tracking_users = self.tracker.fetch_members().await?;
        report.tracking_users = tracking_users.len();
        tracing::info!(count = report.tracking_users, "Found tracking users");

        let allowlisted_tracking_users =
            filters::users_for_emails(&tracking_users, &config.allowlisted_emails);
        report.allowlisted_tracking_users = allowlisted_tracking_users.len();
        tracing::info!(
            count = report.allowlisted_tracking_users,
            "Found allowlisted tracking users"
        );

        let workflows = self.tracker.fetch_workflows().await?;
        let acceptance_state = filters::workflow_state_for_team_with_name(
            &workflows,
            config.team_id,
            &config.acceptance_state_name,
        )
        .map_err(|source| JobError::WorkflowStateNotFound {
            team_id: config.team_id,
            name: config.acceptance_state_name.clone(),
            source,
        })?;
        tracing::info!(state_id = acceptance_state.id, "Resolved acceptance workflow state");

        let projects = self.tracker.fetch_projects().await?;
        let team_projects = filters::projects_for_team(&projects, config.team_id);
        report.team_projects = team_projects.len();
        tracing::info!(
            count = report.team_projects,
            team_id = config.team_id,
            "Found projects for team"
        );

        let mut stories: Vec<Story> = Vec::new();
        for project in &team_projects {
            let fetched = self.tracker.fetch_stories(project.id).await?;
            tracing::debug!(
                project_id = project.id,
                count = fetched.len(),
                "Fetched project stories"
            );
            stories.extend(fetched);
        }
        report.stories = stories.len();
        tracing::info!(count = report.stories, "Found stories");

        let in_acceptance = filters::stories_in_workflow_state(&stories, &acceptance_state);
        report.in_acceptance = in_acceptance.len();
        tracing::info!(count = report.in_acceptance, "Found stories in acceptance");

        let for_allowlisted =
            filters::stories_for_requesters(&in_acceptance, &allowlisted_tracking_users);
        report.for_allowlisted = for_allowlisted.len();
        tracing::info!(
            count = report.for_allowlisted,
            "Found stories in acceptance for allowlisted users"
        );

        report.unparsable_moved_at = for_allowlisted
            .iter()
            .filter(|story| story.moved_at_time().is_err())
            .count();
        if report.unparsable_moved_at > 0 {
            tracing::warn!(
                count = report.unparsable_moved_at,
                "Skipping stories with missing or unparsable moved_at"
            );
        }

        let stale = filters::stories_older_than_threshold(
            &for_allowlisted,
            config.stale_threshold_hours,
            now,
        );
        report.stale = stale.len();
        tracing::info!(
            count = report.stale,
            threshold_hours = config.stale_threshold_hours,
            "Found stale stories in acceptance"
        );

        report.notify = notify_stale_stories(
            &self.chat,
            config,
            &stale,
            &allowlisted_tracking_users,
            &allowlisted_chat_users,
            now,
        )
        .await?;

        Ok(report)
    }
}

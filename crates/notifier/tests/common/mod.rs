//! In-memory fakes for the tracker and chat seams.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use storywatch_clubhouse::{ClubhouseError, TrackerApi};
use storywatch_core::types::{EntityId, Timestamp};
use storywatch_core::{ChatUser, Project, Story, TrackingUser, Workflow, WorkflowState};
use storywatch_slack::{ChatPlatform, SlackError};

/// Fixed "current time" for every test.
pub fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

pub fn hours_ago(hours: i64) -> String {
    (now() - Duration::hours(hours)).to_rfc3339()
}

pub fn story(id: EntityId, requester: &str, state_id: EntityId, moved_at: &str) -> Story {
    Story {
        id,
        name: format!("Story {id}"),
        requester_id: requester.to_string(),
        workflow_state_id: state_id,
        moved_at: Some(moved_at.to_string()),
    }
}

pub fn workflow(team_id: EntityId, states: &[(EntityId, &str)]) -> Workflow {
    Workflow {
        id: team_id * 10,
        team_id,
        states: states
            .iter()
            .map(|(id, name)| WorkflowState {
                id: *id,
                name: name.to_string(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// FakeTracker
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeTracker {
    pub members: Vec<TrackingUser>,
    pub projects: Vec<Project>,
    pub workflows: Vec<Workflow>,
    pub stories: HashMap<EntityId, Vec<Story>>,
    /// Resources that answer with HTTP 500.
    pub failing: HashSet<String>,
    /// Resource paths in request order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl FakeTracker {
    fn respond<T: Clone>(&self, resource: String, items: &[T]) -> Result<Vec<T>, ClubhouseError> {
        self.requests.lock().unwrap().push(resource.clone());
        if self.failing.contains(&resource) {
            return Err(ClubhouseError::Status {
                resource,
                status: 500,
                body: "internal error".into(),
            });
        }
        Ok(items.to_vec())
    }
}

#[async_trait]
impl TrackerApi for FakeTracker {
    async fn fetch_members(&self) -> Result<Vec<TrackingUser>, ClubhouseError> {
        self.respond("members".into(), &self.members)
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>, ClubhouseError> {
        self.respond("projects".into(), &self.projects)
    }

    async fn fetch_workflows(&self) -> Result<Vec<Workflow>, ClubhouseError> {
        self.respond("workflows".into(), &self.workflows)
    }

    async fn fetch_stories(&self, project_id: EntityId) -> Result<Vec<Story>, ClubhouseError> {
        let stories = self.stories.get(&project_id).cloned().unwrap_or_default();
        self.respond(format!("projects/{project_id}/stories"), &stories)
    }
}

// ---------------------------------------------------------------------------
// FakeChat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub user_id: String,
    pub text: String,
    pub username: String,
}

#[derive(Default)]
pub struct FakeChat {
    pub users: Vec<ChatUser>,
    /// Recipients whose sends fail with `channel_not_found`.
    pub failing_recipients: HashSet<String>,
    /// Every attempted send, successful or not.
    pub attempts: Arc<Mutex<Vec<SentMessage>>>,
}

impl FakeChat {
    pub fn with_users(users: Vec<ChatUser>) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    pub fn attempts(&self) -> Vec<SentMessage> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatPlatform for FakeChat {
    async fn list_users(&self) -> Result<Vec<ChatUser>, SlackError> {
        Ok(self.users.clone())
    }

    async fn post_direct_message(
        &self,
        user_id: &str,
        text: &str,
        username: &str,
    ) -> Result<(), SlackError> {
        self.attempts.lock().unwrap().push(SentMessage {
            user_id: user_id.to_string(),
            text: text.to_string(),
            username: username.to_string(),
        });

        if self.failing_recipients.contains(user_id) {
            return Err(SlackError::Api {
                method: "chat.postMessage",
                code: format!("channel_not_found for {user_id}"),
            });
        }
        Ok(())
    }
}

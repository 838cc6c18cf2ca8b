//! Filter/join pipeline over fetched snapshots.
//!
//! Every function is pure: it borrows its inputs and returns a new `Vec`
//! holding clones of the surviving elements in their original order.
//! Matching is exact (no case folding, no trimming) and nothing is
//! deduplicated.

use crate::error::CoreError;
use crate::models::{Member, Project, Story, Workflow, WorkflowState};
use crate::types::{EntityId, Timestamp};

/// Keep users whose email equals some allowlist entry.
pub fn users_for_emails<U, S>(users: &[U], allowlist: &[S]) -> Vec<U>
where
    U: Member + Clone,
    S: AsRef<str>,
{
    users
        .iter()
        .filter(|user| allowlist.iter().any(|email| user.email() == email.as_ref()))
        .cloned()
        .collect()
}

/// Resolve a workflow state by name within a team's workflows.
///
/// Every workflow whose `team_id` matches is searched in order; the first
/// state with an exactly matching name wins. Returns [`CoreError::NotFound`]
/// when no workflow belongs to the team or none of its states match.
pub fn workflow_state_for_team_with_name(
    workflows: &[Workflow],
    team_id: EntityId,
    name: &str,
) -> Result<WorkflowState, CoreError> {
    workflows
        .iter()
        .filter(|workflow| workflow.team_id == team_id)
        .flat_map(|workflow| &workflow.states)
        .find(|state| state.name == name)
        .cloned()
        .ok_or_else(|| CoreError::NotFound {
            entity: "workflow state",
            key: format!("{name:?} for team {team_id}"),
        })
}

pub fn projects_for_team(projects: &[Project], team_id: EntityId) -> Vec<Project> {
    projects
        .iter()
        .filter(|project| project.team_id == team_id)
        .cloned()
        .collect()
}

pub fn stories_in_workflow_state(stories: &[Story], state: &WorkflowState) -> Vec<Story> {
    stories
        .iter()
        .filter(|story| story.workflow_state_id == state.id)
        .cloned()
        .collect()
}

/// Keep stories requested by one of `requesters`.
pub fn stories_for_requesters<U: Member>(stories: &[Story], requesters: &[U]) -> Vec<Story> {
    stories
        .iter()
        .filter(|story| requesters.iter().any(|user| user.id() == story.requester_id))
        .cloned()
        .collect()
}

/// Keep stories that moved strictly before `now - threshold_hours`.
///
/// Stories whose `moved_at` is missing or unparsable are excluded.
pub fn stories_older_than_threshold(
    stories: &[Story],
    threshold_hours: i64,
    now: Timestamp,
) -> Vec<Story> {
    let cutoff = now - chrono::Duration::hours(threshold_hours);
    stories
        .iter()
        .filter(|story| matches!(story.moved_at_time(), Ok(moved) if moved < cutoff))
        .cloned()
        .collect()
}

//! REST client for the Clubhouse tracking API.
//!
//! Wraps the read-only v2 endpoints the job needs (members, projects,
//! workflows, stories per project) using [`reqwest`]. Every call is a
//! single GET returning a JSON array; pagination is not followed.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use storywatch_core::types::EntityId;
use storywatch_core::{Project, Story, TrackingUser, Workflow};

/// Production API root. Resource paths are appended after a `/`.
pub const DEFAULT_API_URL: &str = "https://api.clubhouse.io/api/v2";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from the Clubhouse REST layer, tagged with the failing stage and
/// the resource path that was requested.
#[derive(Debug, thiserror::Error)]
pub enum ClubhouseError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("{resource} request failed: {source}")]
    Request {
        resource: String,
        source: reqwest::Error,
    },

    /// The response arrived but its body could not be read.
    #[error("Failed to read {resource} response body: {source}")]
    Body {
        resource: String,
        source: reqwest::Error,
    },

    /// Clubhouse returned a non-2xx status code.
    #[error("Clubhouse API error on {resource} ({status}): {body}")]
    Status {
        resource: String,
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not the expected JSON array.
    #[error("Failed to decode {resource} response: {source}")]
    Decode {
        resource: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// TrackerApi
// ---------------------------------------------------------------------------

/// Read access to the tracking platform.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    async fn fetch_members(&self) -> Result<Vec<TrackingUser>, ClubhouseError>;

    async fn fetch_projects(&self) -> Result<Vec<Project>, ClubhouseError>;

    async fn fetch_workflows(&self) -> Result<Vec<Workflow>, ClubhouseError>;

    async fn fetch_stories(&self, project_id: EntityId) -> Result<Vec<Story>, ClubhouseError>;
}

// ---------------------------------------------------------------------------
// ClubhouseClient
// ---------------------------------------------------------------------------

/// HTTP client for the Clubhouse v2 API.
pub struct ClubhouseClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl ClubhouseClient {
    /// Create a client against the production API.
    pub fn new(token: String) -> Self {
        Self::with_base_url(reqwest::Client::new(), DEFAULT_API_URL.to_string(), token)
    }

    /// Create a client reusing an existing [`reqwest::Client`] and pointing
    /// at `api_url` (no trailing resource path).
    pub fn with_base_url(client: reqwest::Client, api_url: String, token: String) -> Self {
        Self {
            client,
            api_url,
            token,
        }
    }

    fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), resource)
    }

    /// GET `resource` and decode the body as a JSON array of `T`.
    async fn get_list<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, ClubhouseError> {
        tracing::debug!(resource, "Fetching from Clubhouse");

        // reqwest errors embed the URL, which carries the token.
        let response = self
            .client
            .get(self.resource_url(resource))
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            .map_err(|e| ClubhouseError::Request {
                resource: resource.to_string(),
                source: e.without_url(),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| ClubhouseError::Body {
            resource: resource.to_string(),
            source: e.without_url(),
        })?;

        if !status.is_success() {
            return Err(ClubhouseError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let items = decode_list::<T>(resource, &body)?;
        tracing::debug!(resource, count = items.len(), "Decoded Clubhouse response");
        Ok(items)
    }
}

#[async_trait]
impl TrackerApi for ClubhouseClient {
    async fn fetch_members(&self) -> Result<Vec<TrackingUser>, ClubhouseError> {
        self.get_list("members").await
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>, ClubhouseError> {
        self.get_list("projects").await
    }

    async fn fetch_workflows(&self) -> Result<Vec<Workflow>, ClubhouseError> {
        self.get_list("workflows").await
    }

    async fn fetch_stories(&self, project_id: EntityId) -> Result<Vec<Story>, ClubhouseError> {
        self.get_list(&format!("projects/{project_id}/stories")).await
    }
}

fn decode_list<T: DeserializeOwned>(resource: &str, body: &[u8]) -> Result<Vec<T>, ClubhouseError> {
    serde_json::from_slice(body).map_err(|source| ClubhouseError::Decode {
        resource: resource.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

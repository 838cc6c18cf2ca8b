//! Slack Web API client.
//!
//! Covers the two methods the job uses: `users.list` to map email
//! addresses to Slack user ids, and `chat.postMessage` to send a direct
//! message. Slack reports method-level failures as HTTP 200 with
//! `"ok": false`; those surface as [`SlackError::Api`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use storywatch_core::ChatUser;

/// Production Web API root. Method names are appended after a `/`.
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

const METHOD_USERS_LIST: &str = "users.list";
const METHOD_POST_MESSAGE: &str = "chat.postMessage";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from the Slack Web API layer, tagged with the API method.
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    #[error("Slack {method} request failed: {source}")]
    Request {
        method: &'static str,
        source: reqwest::Error,
    },

    #[error("Failed to read Slack {method} response body: {source}")]
    Body {
        method: &'static str,
        source: reqwest::Error,
    },

    #[error("Slack {method} returned HTTP {status}: {body}")]
    Status {
        method: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to decode Slack {method} response: {source}")]
    Decode {
        method: &'static str,
        source: serde_json::Error,
    },

    /// Slack answered `"ok": false` with an error code.
    #[error("Slack {method} failed: {code}")]
    Api { method: &'static str, code: String },
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UsersListResponse {
    ok: bool,
    #[serde(default)]
    members: Vec<ChatUser>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    username: &'a str,
    as_user: bool,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// ChatPlatform
// ---------------------------------------------------------------------------

/// The chat operations the notifier depends on.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// List workspace users (first page only).
    async fn list_users(&self) -> Result<Vec<ChatUser>, SlackError>;

    /// Send `text` as a direct message to `user_id`, shown as `username`.
    async fn post_direct_message(
        &self,
        user_id: &str,
        text: &str,
        username: &str,
    ) -> Result<(), SlackError>;
}

// ---------------------------------------------------------------------------
// SlackClient
// ---------------------------------------------------------------------------

/// HTTP client for the Slack Web API, authenticated with a bot token.
pub struct SlackClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl SlackClient {
    /// Create a client against the production API.
    pub fn new(token: String) -> Self {
        Self::with_base_url(reqwest::Client::new(), DEFAULT_API_URL.to_string(), token)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_base_url(client: reqwest::Client, api_url: String, token: String) -> Self {
        Self {
            client,
            api_url,
            token,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), method)
    }

    /// Send a prepared request and decode the JSON envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SlackError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| SlackError::Request { method, source })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| SlackError::Body { method, source })?;

        if !status.is_success() {
            return Err(SlackError::Status {
                method,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        decode(method, &body)
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn list_users(&self) -> Result<Vec<ChatUser>, SlackError> {
        tracing::debug!(method = METHOD_USERS_LIST, "Calling Slack");

        let request = self.client.get(self.method_url(METHOD_USERS_LIST));
        let response: UsersListResponse = self.call(METHOD_USERS_LIST, request).await?;
        ensure_ok(METHOD_USERS_LIST, response.ok, response.error)?;

        tracing::debug!(count = response.members.len(), "Decoded Slack users");
        Ok(response.members)
    }

    async fn post_direct_message(
        &self,
        user_id: &str,
        text: &str,
        username: &str,
    ) -> Result<(), SlackError> {
        tracing::debug!(method = METHOD_POST_MESSAGE, user_id, "Calling Slack");

        let payload = PostMessageRequest {
            channel: user_id,
            text,
            username,
            as_user: true,
        };
        let request = self
            .client
            .post(self.method_url(METHOD_POST_MESSAGE))
            .json(&payload);
        let response: PostMessageResponse = self.call(METHOD_POST_MESSAGE, request).await?;
        ensure_ok(METHOD_POST_MESSAGE, response.ok, response.error)
    }
}

fn decode<T: DeserializeOwned>(method: &'static str, body: &[u8]) -> Result<T, SlackError> {
    serde_json::from_slice(body).map_err(|source| SlackError::Decode { method, source })
}

/// Turn a `"ok": false` envelope into [`SlackError::Api`].
fn ensure_ok(method: &'static str, ok: bool, error: Option<String>) -> Result<(), SlackError> {
    if ok {
        return Ok(());
    }
    Err(SlackError::Api {
        method,
        code: error.unwrap_or_else(|| "unknown_error".to_string()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

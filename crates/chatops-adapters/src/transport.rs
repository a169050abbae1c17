//! Transport — hands rendered messages to the chat backend.
//!
//! `WebhookTransport` posts to an incoming-webhook endpoint, which is how
//! Mattermost (and most Slack-like backends) accept bot posts without a
//! long-lived session.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use chatops_core::{Envelope, OutgoingMessage, TransportError};

/// Delivers one message to one room.
///
/// Implementations are shared across concurrent dispatches and must be
/// safe to call from several tasks at once.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, envelope: &Envelope, message: &OutgoingMessage) -> Result<(), TransportError>;
}

// ─────────────────────────────────────────────
// WebhookTransport
// ─────────────────────────────────────────────

/// Default upper bound on one webhook request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts messages as JSON to an incoming webhook.
pub struct WebhookTransport {
    http: reqwest::Client,
    url: String,
    username: Option<String>,
    icon_url: Option<String>,
    timeout: Duration,
}

impl WebhookTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            username: None,
            icon_url: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the display name of posts.
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    /// Override the avatar of posts.
    pub fn with_icon_url(mut self, icon_url: Option<String>) -> Self {
        self.icon_url = icon_url;
        self
    }

    /// Bound each request; a webhook that never answers fails the send.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the webhook request body.
    fn payload(&self, envelope: &Envelope, message: &OutgoingMessage) -> Value {
        let mut body = json!({ "channel": channel_for(envelope) });

        if let Some(text) = &message.message {
            body["text"] = json!(text);
        }
        if !message.is_plain() {
            body["props"] = json!({ "attachments": message.props.attachments });
        }
        if let Some(username) = &self.username {
            body["username"] = json!(username);
        }
        if let Some(icon_url) = &self.icon_url {
            body["icon_url"] = json!(icon_url);
        }

        body
    }
}

#[async_trait]
impl Transport for WebhookTransport {
    async fn send(&self, envelope: &Envelope, message: &OutgoingMessage) -> Result<(), TransportError> {
        if self.url.is_empty() {
            return Err(TransportError::NotConfigured("webhook url is empty".into()));
        }

        let body = self.payload(envelope, message);
        debug!(room = %envelope.room, plain = message.is_plain(), "posting to webhook");

        let resp = self
            .http
            .post(&self.url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Request(format!("webhook timed out after {:?}", self.timeout))
                } else {
                    TransportError::Request(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Webhook `channel` value: direct messages are addressed as `@user`.
fn channel_for(envelope: &Envelope) -> String {
    if envelope.direct && !envelope.room.starts_with('@') {
        format!("@{}", envelope.room)
    } else {
        envelope.room.clone()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

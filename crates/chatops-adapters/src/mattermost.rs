//! Mattermost adapter — renders notifications as colored attachments.
//!
//! One notification becomes:
//! - a single plain post when there is no body (just the mention and pretext)
//! - otherwise one post per body chunk, each carrying the styled attachment,
//!   with the mention/pretext line as top-level text on the first post only
//!
//! Posts of one notification go out sequentially with a pacing delay in
//! between, so long outputs do not trip the server's rate limiter.
//!
//! Callers may reshape the attachment through `extra.mattermost`, e.g.:
//!
//! ```json
//! {
//!   "message": "Message text",
//!   "extra": {
//!     "mattermost": {
//!       "author_name": "Jira_Bot",
//!       "title": "PROJ-42",
//!       "title_link": "https://jira.example.com/browse/PROJ-42",
//!       "fields": [{ "title": "Summary", "value": "Broken build", "short": false }]
//!     }
//!   }
//! }
//! ```
//!
//! Keys are merged over the defaults as-is. A full `attachments` list replaces
//! the generated attachment entirely.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

use chatops_core::config::Config;
use chatops_core::{Envelope, NotificationRecord, OutgoingMessage, RenderedChunk, StyleOverrides};

use crate::base::{send_paced, ChatAdapter, DeliveryReport};
use crate::formatting::{AttachmentFormatter, ChunkSplitter, PretextSplitter, TextFormatter};
use crate::pacing::{Pacer, TokioPacer};
use crate::routing::{resolve_routing, StatusColors};
use crate::transport::Transport;

/// Adapter name, also the key of platform overrides in `extra`.
pub const PLATFORM: &str = "mattermost";

/// Default delay between chunks of one notification.
pub const DEFAULT_PACING: Duration = Duration::from_millis(300);

/// What a notification renders to, before any I/O.
#[derive(Clone, Debug, PartialEq)]
pub enum DeliveryPlan {
    /// No body: one plain post of mention + pretext.
    Direct { routing: Envelope, text: String },
    /// One attachment post per body chunk.
    Chunked {
        routing: Envelope,
        chunks: Vec<RenderedChunk>,
    },
}

impl DeliveryPlan {
    /// Target room and the messages to send there, in order.
    fn into_messages(self) -> (Envelope, Vec<OutgoingMessage>) {
        match self {
            DeliveryPlan::Direct { routing, text } => (routing, vec![OutgoingMessage::plain(text)]),
            DeliveryPlan::Chunked { routing, chunks } => {
                let messages = chunks.iter().map(RenderedChunk::to_message).collect();
                (routing, messages)
            }
        }
    }
}

// ─────────────────────────────────────────────
// MattermostAdapter
// ─────────────────────────────────────────────

/// Mattermost backend: routing, status color, override merge, chunked delivery.
pub struct MattermostAdapter {
    transport: Arc<dyn Transport>,
    formatter: Arc<dyn TextFormatter>,
    splitter: Arc<dyn ChunkSplitter>,
    pacer: Arc<dyn Pacer>,
    colors: StatusColors,
    pacing: Duration,
}

impl MattermostAdapter {
    /// Create an adapter with the default formatter, splitter and pacing.
    pub fn new(transport: Arc<dyn Transport>, colors: StatusColors) -> Self {
        Self {
            transport,
            formatter: Arc::new(AttachmentFormatter),
            splitter: Arc::new(PretextSplitter::default()),
            pacer: Arc::new(TokioPacer),
            colors,
            pacing: DEFAULT_PACING,
        }
    }

    /// Create an adapter from loaded configuration.
    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, StatusColors::from(&config.mattermost))
            .with_splitter(Arc::new(PretextSplitter::new(config.delivery.chunk_size)))
            .with_pacing(config.delivery.pacing())
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn TextFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_splitter(mut self, splitter: Arc<dyn ChunkSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Render a record into its delivery plan.
    pub fn render(&self, record: &NotificationRecord) -> DeliveryPlan {
        let routing = resolve_routing(record);
        let color = self.colors.resolve(record);

        let formatted = self.formatter.format(&record.message);
        let split = self.splitter.split(&formatted);
        let greeting = format!("{}{}", routing.mention, split.pretext);

        let chunks = match split.text {
            Some(chunks) if !chunks.is_empty() => chunks,
            _ => {
                return DeliveryPlan::Direct {
                    routing: routing.envelope,
                    text: greeting,
                }
            }
        };

        let mut content = default_presentation(&color);
        if let Some(overrides) = record.style_overrides(PLATFORM) {
            merge_overrides(&mut content, overrides);
        }

        let chunks = chunks
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                content.insert("text".into(), json!(text));
                content.insert("fallback".into(), json!(text));

                // The greeting rides on index 0 even when it is empty.
                RenderedChunk {
                    index,
                    attachment_payload: attachments_for(&content),
                    greeting: (index == 0).then(|| greeting.clone()),
                    routing: routing.envelope.clone(),
                    text,
                }
            })
            .collect();

        DeliveryPlan::Chunked {
            routing: routing.envelope,
            chunks,
        }
    }
}

#[async_trait]
impl ChatAdapter for MattermostAdapter {
    fn name(&self) -> &str {
        PLATFORM
    }

    async fn deliver(&self, record: &NotificationRecord) -> DeliveryReport {
        let (routing, messages) = self.render(record).into_messages();

        debug!(room = %routing.room, chunks = messages.len(), "delivering notification");
        let report = send_paced(
            self.transport.as_ref(),
            self.pacer.as_ref(),
            self.pacing,
            &routing,
            messages,
        )
        .await;

        info!(
            room = %report.room,
            sent = report.sent,
            failed = report.failed,
            "notification delivered"
        );
        report
    }
}

// ─────────────────────────────────────────────
// Presentation helpers
// ─────────────────────────────────────────────

/// Attachment defaults before any override.
fn default_presentation(color: &str) -> StyleOverrides {
    let mut content = StyleOverrides::new();
    content.insert("color".into(), json!(color));
    content.insert("mrkdwn_in".into(), json!(["text", "pretext"]));
    content
}

/// Shallow merge: every override key replaces the default, unknown keys pass through.
fn merge_overrides(content: &mut StyleOverrides, overrides: &StyleOverrides) {
    for (key, value) in overrides {
        content.insert(key.clone(), value.clone());
    }
}

/// A caller-supplied `attachments` list wins; otherwise the content is the attachment.
fn attachments_for(content: &StyleOverrides) -> Vec<Value> {
    match content.get("attachments") {
        Some(Value::Array(custom)) => custom.clone(),
        _ => vec![Value::Object(content.clone())],
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

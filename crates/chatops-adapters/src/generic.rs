//! Generic adapter — plain-text delivery for chats without attachments.
//!
//! Shares routing, splitting and pacing with the Mattermost adapter but sends
//! every chunk as plain text. The mention and pretext lead the first chunk.
//!
//! `maxMessageLength` caps the body after the pretext is split off; the
//! capped body is then chunked like any other.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use chatops_core::config::Config;
use chatops_core::{NotificationRecord, OutgoingMessage};

use crate::base::{send_paced, ChatAdapter, DeliveryReport};
use crate::formatting::{ChunkSplitter, PlainFormatter, PretextSplitter, TextFormatter};
use crate::mattermost::DEFAULT_PACING;
use crate::pacing::{Pacer, TokioPacer};
use crate::routing::resolve_routing;
use crate::transport::Transport;

pub const PLATFORM: &str = "generic";

/// Plain-text backend.
pub struct GenericAdapter {
    transport: Arc<dyn Transport>,
    formatter: Arc<dyn TextFormatter>,
    splitter: Arc<dyn ChunkSplitter>,
    pacer: Arc<dyn Pacer>,
    pacing: Duration,
}

impl GenericAdapter {
    pub fn new(transport: Arc<dyn Transport>, max_message_length: usize) -> Self {
        Self {
            transport,
            formatter: Arc::new(PlainFormatter),
            splitter: Arc::new(PretextSplitter::default().with_body_limit(max_message_length)),
            pacer: Arc::new(TokioPacer),
            pacing: DEFAULT_PACING,
        }
    }

    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, config.generic.max_message_length)
            .with_splitter(Arc::new(
                PretextSplitter::new(config.delivery.chunk_size)
                    .with_body_limit(config.generic.max_message_length),
            ))
            .with_pacing(config.delivery.pacing())
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

    /// Plain texts to send, in order.
    fn render(&self, mention: &str, message: &str) -> Vec<String> {
        let split = self.splitter.split(&self.formatter.format(message));
        let lead = format!("{mention}{}", split.pretext);

        let chunks = match split.text {
            Some(chunks) if !chunks.is_empty() => chunks,
            _ => return vec![lead],
        };

        chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| match i {
                0 if split.pretext.is_empty() => format!("{lead}{chunk}"),
                0 => format!("{lead}\n{chunk}"),
                _ => chunk,
            })
            .collect()
    }
}

#[async_trait]
impl ChatAdapter for GenericAdapter {
    fn name(&self) -> &str {
        PLATFORM
    }

    async fn deliver(&self, record: &NotificationRecord) -> DeliveryReport {
        let routing = resolve_routing(record);
        let messages = self
            .render(&routing.mention, &record.message)
            .into_iter()
            .map(OutgoingMessage::plain)
            .collect();

        let report = send_paced(
            self.transport.as_ref(),
            self.pacer.as_ref(),
            self.pacing,
            &routing.envelope,
            messages,
        )
        .await;

        info!(room = %report.room, sent = report.sent, failed = report.failed, "notification delivered");
        report
    }
}

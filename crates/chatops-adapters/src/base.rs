//! ChatAdapter trait — the abstract interface every chat backend implements.
//!
//! Each backend (Mattermost, plain-text webhook, ...) implements this trait to:
//! - `name()` — adapter identifier matching the `adapter` config key
//! - `deliver()` — render one notification and send it, chunk by chunk
//!
//! Callers that do not care about the outcome use [`dispatch`], which runs the
//! delivery on its own task and returns immediately.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use chatops_core::{Envelope, NotificationRecord, OutgoingMessage};

use crate::pacing::Pacer;
use crate::transport::Transport;

/// Every chat backend implements this trait.
///
/// The `AdapterManager` holds `Arc<dyn ChatAdapter>` and fires a dispatch per
/// notification pulled from the bus.
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Unique adapter name (e.g. "mattermost", "generic").
    fn name(&self) -> &str;

    /// Render `record` and deliver every resulting message in order.
    ///
    /// Transport failures are logged and counted in the report, never
    /// retried, and never stop the remaining chunks.
    async fn deliver(&self, record: &NotificationRecord) -> DeliveryReport;
}

/// Outcome of delivering one notification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Room the messages were addressed to.
    pub room: String,
    /// Messages the transport accepted.
    pub sent: usize,
    /// Messages the transport rejected.
    pub failed: usize,
}

impl DeliveryReport {
    /// Total send attempts.
    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Fire-and-forget delivery on a new task.
///
/// The handle can be awaited for the report or dropped; dropping it does not
/// cancel the delivery.
pub fn dispatch(adapter: Arc<dyn ChatAdapter>, record: NotificationRecord) -> JoinHandle<DeliveryReport> {
    tokio::spawn(async move { adapter.deliver(&record).await })
}

/// Send `messages` to one room in order, pausing `interval` between sends.
///
/// There is no pause before the first message or after the last one.
pub async fn send_paced(
    transport: &dyn Transport,
    pacer: &dyn Pacer,
    interval: Duration,
    envelope: &Envelope,
    messages: Vec<OutgoingMessage>,
) -> DeliveryReport {
    let total = messages.len();
    let mut report = DeliveryReport {
        room: envelope.room.clone(),
        ..Default::default()
    };

    for (i, message) in messages.iter().enumerate() {
        match transport.send(envelope, message).await {
            Ok(()) => {
                report.sent += 1;
                debug!(room = %envelope.room, chunk = i, total, "message sent");
            }
            Err(e) => {
                report.failed += 1;
                warn!(room = %envelope.room, chunk = i, total, error = %e, "failed to send message");
            }
        }

        if i + 1 < total {
            pacer.pause(interval).await;
        }
    }

    report
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, EventLog, RecordingPacer, RecordingTransport};

    #[tokio::test]
    async fn test_send_paced_interleaves_pauses() {
        let log = EventLog::default();
        let transport = RecordingTransport::new(log.clone());
        let pacer = RecordingPacer::new(log.clone());
        let messages = vec![
            OutgoingMessage::plain("one"),
            OutgoingMessage::plain("two"),
            OutgoingMessage::plain("three"),
        ];

        let report = send_paced(
            &transport,
            &pacer,
            Duration::from_millis(300),
            &Envelope::new("ops"),
            messages,
        )
        .await;

        assert_eq!(report.sent, 3);
        assert!(report.is_complete());

        let events = log.events();
        assert_eq!(events.len(), 5);
        assert!(matches!(&events[0], Event::Sent { message, .. } if message.message.as_deref() == Some("one")));
        assert_eq!(events[1], Event::Paused(Duration::from_millis(300)));
        assert!(matches!(&events[2], Event::Sent { message, .. } if message.message.as_deref() == Some("two")));
        assert_eq!(events[3], Event::Paused(Duration::from_millis(300)));
        assert!(matches!(&events[4], Event::Sent { message, .. } if message.message.as_deref() == Some("three")));
    }

    #[tokio::test]
    async fn test_send_paced_single_message_no_pause() {
        let log = EventLog::default();
        let transport = RecordingTransport::new(log.clone());
        let pacer = RecordingPacer::new(log.clone());

        send_paced(
            &transport,
            &pacer,
            Duration::from_millis(300),
            &Envelope::new("ops"),
            vec![OutgoingMessage::plain("only")],
        )
        .await;

        assert_eq!(log.pauses(), 0);
        assert_eq!(log.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_send_paced_continues_after_failure() {
        let log = EventLog::default();
        let transport = RecordingTransport::failing_at(log.clone(), &[0]);
        let pacer = RecordingPacer::new(log.clone());

        let report = send_paced(
            &transport,
            &pacer,
            Duration::from_millis(10),
            &Envelope::new("ops"),
            vec![OutgoingMessage::plain("a"), OutgoingMessage::plain("b")],
        )
        .await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(report.attempted(), 2);
        assert!(!report.is_complete());
        assert_eq!(log.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_send_paced_empty() {
        let log = EventLog::default();
        let transport = RecordingTransport::new(log.clone());
        let pacer = RecordingPacer::new(log.clone());

        let report = send_paced(&transport, &pacer, Duration::ZERO, &Envelope::new("ops"), Vec::new()).await;

        assert_eq!(report.attempted(), 0);
        assert!(log.events().is_empty());
    }

    /// An adapter that records what it was asked to deliver.
    struct EchoAdapter {
        log: EventLog,
    }

    #[async_trait]
    impl ChatAdapter for EchoAdapter {
        fn name(&self) -> &str {
            "echo"
        }

        async fn deliver(&self, record: &NotificationRecord) -> DeliveryReport {
            let transport = RecordingTransport::new(self.log.clone());
            let envelope = Envelope::new(record.channel.as_str());
            let _ = transport
                .send(&envelope, &OutgoingMessage::plain(record.message.as_str()))
                .await;
            DeliveryReport {
                room: envelope.room,
                sent: 1,
                failed: 0,
            }
        }
    }

    #[tokio::test]
    async fn test_dispatch_runs_on_task() {
        let log = EventLog::default();
        let adapter: Arc<dyn ChatAdapter> = Arc::new(EchoAdapter { log: log.clone() });

        let handle = dispatch(adapter, NotificationRecord::new("ops", "hi"));
        let report = handle.await.unwrap();

        assert_eq!(report.room, "ops");
        assert_eq!(log.sent().len(), 1);
    }
}

//! Test doubles: a transport and a pacer that write into one shared log,
//! so tests can assert on the exact interleaving of sends and pauses.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use chatops_core::{Envelope, OutgoingMessage, TransportError};

use crate::pacing::Pacer;
use crate::transport::Transport;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Sent { room: String, message: OutgoingMessage },
    Paused(Duration),
}

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    /// Successful sends, in order.
    pub fn sent(&self) -> Vec<(String, OutgoingMessage)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Sent { room, message } => Some((room, message)),
                Event::Paused(_) => None,
            })
            .collect()
    }

    pub fn pauses(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Paused(_)))
            .count()
    }
}

/// Records sends; optionally rejects the attempts at the given indices.
pub struct RecordingTransport {
    log: EventLog,
    fail_at: Vec<usize>,
    attempts: Mutex<usize>,
}

impl RecordingTransport {
    pub fn new(log: EventLog) -> Self {
        Self::failing_at(log, &[])
    }

    pub fn failing_at(log: EventLog, fail_at: &[usize]) -> Self {
        Self {
            log,
            fail_at: fail_at.to_vec(),
            attempts: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, envelope: &Envelope, message: &OutgoingMessage) -> Result<(), TransportError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let current = *attempts;
            *attempts += 1;
            current
        };

        if self.fail_at.contains(&attempt) {
            return Err(TransportError::Status {
                status: 500,
                body: "boom".into(),
            });
        }

        self.log.push(Event::Sent {
            room: envelope.room.clone(),
            message: message.clone(),
        });
        Ok(())
    }
}

/// Records pauses without sleeping.
pub struct RecordingPacer {
    log: EventLog,
}

impl RecordingPacer {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, interval: Duration) {
        self.log.push(Event::Paused(interval));
        tokio::task::yield_now().await;
    }
}

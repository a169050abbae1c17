//! Notification bus — bounded queue between the upstream feed and the adapters.
//!
//! Uses a tokio::sync::mpsc bounded channel. Producers (stdin reader, tests,
//! an embedding service) publish records; the `AdapterManager` consumes them.

use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::debug;

use crate::types::NotificationRecord;

/// The queue connecting notification producers to the adapter manager.
///
/// The bus owns one sender. `close()` drops it so that, once every cloned
/// sender is gone too, `consume()` drains the remaining records and then
/// returns `None`.
pub struct NotificationBus {
    tx: Mutex<Option<mpsc::Sender<NotificationRecord>>>,
    rx: tokio::sync::Mutex<mpsc::Receiver<NotificationRecord>>,
}

impl NotificationBus {
    /// Create a new bus with the given buffer capacity.
    pub fn new(buffer_size: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size);

        NotificationBus {
            tx: Mutex::new(Some(tx)),
            rx: tokio::sync::Mutex::new(rx),
        }
    }

    /// Publish a record. Fails if the bus has been closed.
    pub async fn publish(
        &self,
        record: NotificationRecord,
    ) -> Result<(), mpsc::error::SendError<NotificationRecord>> {
        match self.sender() {
            Some(tx) => tx.send(record).await,
            None => Err(mpsc::error::SendError(record)),
        }
    }

    /// Consume the next record (blocks until available).
    /// Returns None once the bus is closed and drained.
    pub async fn consume(&self) -> Option<NotificationRecord> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Get a clone of the sender, or `None` if the bus is closed.
    pub fn sender(&self) -> Option<mpsc::Sender<NotificationRecord>> {
        self.tx.lock().ok().and_then(|guard| guard.as_ref().cloned())
    }

    /// Stop accepting new records.
    pub fn close(&self) {
        if let Ok(mut guard) = self.tx.lock() {
            if guard.take().is_some() {
                debug!("notification bus closed");
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.lock().map(|guard| guard.is_none()).unwrap_or(true)
    }
}

//! Adapter Manager — drains the notification bus into chat adapters.
//!
//! Responsibilities:
//! - Register available adapters by name
//! - Consume records from the bus and fire one dispatch per record
//! - Let in-flight dispatches finish before returning
//! - Summarize what was delivered

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use chatops_core::bus::NotificationBus;

use crate::base::{dispatch, ChatAdapter, DeliveryReport};

// ─────────────────────────────────────────────
// AdapterManager
// ─────────────────────────────────────────────

/// Totals for one `run`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelaySummary {
    /// Notifications pulled from the bus.
    pub dispatched: usize,
    /// Messages accepted by the transport.
    pub sent: usize,
    /// Messages rejected by the transport.
    pub failed: usize,
}

impl RelaySummary {
    fn record(&mut self, report: &DeliveryReport) {
        self.sent += report.sent;
        self.failed += report.failed;
    }
}

/// Owns the registered adapters and routes bus records to the active one.
pub struct AdapterManager {
    /// Registered adapters, keyed by name.
    adapters: HashMap<String, Arc<dyn ChatAdapter>>,
    /// Bus the records come from.
    bus: Arc<NotificationBus>,
    /// Shutdown signal.
    shutdown: Arc<Notify>,
}

impl AdapterManager {
    pub fn new(bus: Arc<NotificationBus>) -> Self {
        Self {
            adapters: HashMap::new(),
            bus,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Register an adapter. Overwrites any previous adapter with the same name.
    pub fn register(&mut self, adapter: Arc<dyn ChatAdapter>) {
        let name = adapter.name().to_string();
        info!(adapter = %name, "registered adapter");
        self.adapters.insert(name, adapter);
    }

    /// Unregister an adapter by name.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn ChatAdapter>> {
        let removed = self.adapters.remove(name);
        if removed.is_some() {
            info!(adapter = %name, "unregistered adapter");
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ChatAdapter>> {
        self.adapters.get(name)
    }

    /// Names of all registered adapters, sorted.
    pub fn adapter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.adapters.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Handle that can be used to stop `run` from another task.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Ask `run` to stop taking new records.
    ///
    /// Stores a permit, so a signal sent before `run` starts waiting still counts.
    pub fn signal_shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Relay bus records to the adapter named `active` until the bus is
    /// closed and drained, or shutdown is signalled.
    ///
    /// Each record is dispatched on its own task, so a long paced delivery
    /// never holds up the next notification. Dispatches already started are
    /// always awaited before returning.
    pub async fn run(&self, active: &str) -> Result<RelaySummary> {
        let Some(adapter) = self.adapters.get(active).cloned() else {
            bail!(
                "no adapter named '{}' (registered: {})",
                active,
                self.adapter_names().join(", ")
            );
        };

        info!(adapter = %active, "relay started");

        let mut summary = RelaySummary::default();
        let mut in_flight: Vec<JoinHandle<DeliveryReport>> = Vec::new();

        loop {
            tokio::select! {
                record = self.bus.consume() => {
                    match record {
                        Some(record) => {
                            debug!(
                                channel = %record.channel,
                                whisper = record.whisper,
                                message_len = record.message.len(),
                                "dispatching notification"
                            );
                            summary.dispatched += 1;
                            in_flight.push(dispatch(adapter.clone(), record));
                        }
                        None => {
                            info!("notification bus closed, relay draining");
                            break;
                        }
                    }
                }
                _ = self.shutdown.notified() => {
                    warn!(in_flight = in_flight.len(), "relay received shutdown signal");
                    break;
                }
            }

            // Reap finished deliveries so the list stays short.
            let (done, pending): (Vec<_>, Vec<_>) = in_flight.into_iter().partition(|h| h.is_finished());
            in_flight = pending;
            for handle in done {
                Self::collect(handle, &mut summary).await;
            }
        }

        for handle in in_flight {
            Self::collect(handle, &mut summary).await;
        }

        info!(
            dispatched = summary.dispatched,
            sent = summary.sent,
            failed = summary.failed,
            "relay finished"
        );
        Ok(summary)
    }

    async fn collect(handle: JoinHandle<DeliveryReport>, summary: &mut RelaySummary) {
        match handle.await {
            Ok(report) => summary.record(&report),
            Err(e) => error!(error = %e, "delivery task failed"),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mattermost::MattermostAdapter;
    use crate::routing::StatusColors;
    use crate::testing::{EventLog, RecordingPacer, RecordingTransport};
    use chatops_core::NotificationRecord;

    fn mattermost(log: &EventLog) -> Arc<dyn ChatAdapter> {
        Arc::new(
            MattermostAdapter::new(
                Arc::new(RecordingTransport::new(log.clone())),
                StatusColors::new("#0f0", "#f00"),
            )
            .with_pacer(Arc::new(RecordingPacer::new(log.clone()))),
        )
    }

    /// Adapter whose deliveries never finish on their own.
    struct StuckAdapter;

    #[async_trait::async_trait]
    impl ChatAdapter for StuckAdapter {
        fn name(&self) -> &str {
            "stuck"
        }

        async fn deliver(&self, _record: &NotificationRecord) -> DeliveryReport {
            std::future::pending::<()>().await;
            DeliveryReport::default()
        }
    }

    #[test]
    fn test_new_manager_empty() {
        let mgr = AdapterManager::new(Arc::new(NotificationBus::new(8)));
        assert!(mgr.is_empty());
        assert_eq!(mgr.len(), 0);
    }

    #[test]
    fn test_register_adapter() {
        let log = EventLog::default();
        let mut mgr = AdapterManager::new(Arc::new(NotificationBus::new(8)));

        mgr.register(mattermost(&log));

        assert_eq!(mgr.len(), 1);
        assert!(mgr.get("mattermost").is_some());
        assert!(mgr.get("generic").is_none());
    }

    #[test]
    fn test_register_overwrites_and_sorts() {
        let log = EventLog::default();
        let mut mgr = AdapterManager::new(Arc::new(NotificationBus::new(8)));

        mgr.register(Arc::new(StuckAdapter));
        mgr.register(mattermost(&log));
        mgr.register(mattermost(&log));

        assert_eq!(mgr.len(), 2);
        assert_eq!(mgr.adapter_names(), vec!["mattermost", "stuck"]);
    }

    #[test]
    fn test_unregister() {
        let log = EventLog::default();
        let mut mgr = AdapterManager::new(Arc::new(NotificationBus::new(8)));
        mgr.register(mattermost(&log));

        assert!(mgr.unregister("mattermost").is_some());
        assert!(mgr.unregister("mattermost").is_none());
        assert!(mgr.is_empty());
    }

    #[tokio::test]
    async fn test_run_unknown_adapter() {
        let mgr = AdapterManager::new(Arc::new(NotificationBus::new(8)));
        let err = mgr.run("hipchat").await.unwrap_err();
        assert!(err.to_string().contains("hipchat"));
    }

    #[tokio::test]
    async fn test_run_drains_closed_bus() {
        let log = EventLog::default();
        let bus = Arc::new(NotificationBus::new(8));
        let mut mgr = AdapterManager::new(bus.clone());
        mgr.register(mattermost(&log));

        bus.publish(NotificationRecord::new("ops", "one")).await.unwrap();
        bus.publish(NotificationRecord::new("dev", "x".repeat(3801))).await.unwrap();
        bus.publish(NotificationRecord::new("ops", "").with_user("alice")).await.unwrap();
        bus.close();

        let summary = mgr.run("mattermost").await.unwrap();

        assert_eq!(summary.dispatched, 3);
        assert_eq!(summary.sent, 4);
        assert_eq!(summary.failed, 0);
        assert_eq!(log.sent().len(), 4);
    }

    #[tokio::test]
    async fn test_shutdown_before_run() {
        let bus = Arc::new(NotificationBus::new(8));
        let mut mgr = AdapterManager::new(bus);
        mgr.register(Arc::new(StuckAdapter));

        mgr.signal_shutdown();
        let summary = mgr.run("stuck").await.unwrap();
        assert_eq!(summary, RelaySummary::default());
    }

    #[tokio::test]
    async fn test_shutdown_from_other_task() {
        let log = EventLog::default();
        let bus = Arc::new(NotificationBus::new(8));
        let mut mgr = AdapterManager::new(bus.clone());
        mgr.register(mattermost(&log));

        let shutdown = mgr.shutdown_handle();
        let publisher = bus.clone();
        tokio::spawn(async move {
            publisher.publish(NotificationRecord::new("ops", "hi")).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            shutdown.notify_one();
        });

        let summary = mgr.run("mattermost").await.unwrap();
        assert_eq!(summary.dispatched, 1);
        assert_eq!(summary.sent, 1);
    }
}

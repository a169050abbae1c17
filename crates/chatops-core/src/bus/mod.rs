//! Notification bus — decouples record producers from the adapter manager.

pub mod queue;

pub use queue::NotificationBus;

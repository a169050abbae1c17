//! Chatops Adapters — render notifications and deliver them to chat backends.
//!
//! This crate provides:
//! - **base**: The `ChatAdapter` trait, `dispatch`, and paced sending
//! - **routing**: direct-vs-channel routing and status colors
//! - **formatting**: `TextFormatter` / `ChunkSplitter` collaborators
//! - **transport**: the `Transport` trait and `WebhookTransport`
//! - **mattermost** / **generic**: concrete adapters
//! - **manager**: `AdapterManager` — drains the notification bus

pub mod base;
pub mod formatting;
pub mod generic;
pub mod manager;
pub mod mattermost;
pub mod pacing;
pub mod routing;
pub mod transport;

#[cfg(test)]
mod testing;

pub use base::{dispatch, ChatAdapter, DeliveryReport};
pub use generic::GenericAdapter;
pub use manager::{AdapterManager, RelaySummary};
pub use mattermost::MattermostAdapter;
pub use transport::{Transport, WebhookTransport};

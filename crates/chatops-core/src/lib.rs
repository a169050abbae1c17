//! Chatops Core — shared types, configuration, and plumbing.
//!
//! This crate provides:
//! - **types**: `NotificationRecord`, `Envelope`, `RenderedChunk`, `OutgoingMessage`
//! - **error**: `RecordError` and `TransportError`
//! - **config**: JSON config schema, loader, and env overrides
//! - **bus**: `NotificationBus`, the queue feeding the adapter manager
//! - **utils**: paths and string helpers

pub mod bus;
pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::{RecordError, TransportError};
pub use types::{Envelope, Extra, NotificationRecord, OutgoingMessage, RenderedChunk, StyleOverrides};

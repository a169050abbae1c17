//! Error types shared across the workspace.

use thiserror::Error;

/// A notification record could not be read.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid notification record: {0}")]
    Json(#[from] serde_json::Error),
}

/// A transport failed to hand a message to the chat backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No endpoint configured for this transport.
    #[error("transport not configured: {0}")]
    NotConfigured(String),

    /// The request never got a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

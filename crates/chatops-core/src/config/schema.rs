//! Configuration schema — adapter selection, backend endpoints, delivery pacing.
//!
//! Hierarchy: `Config` → `MattermostConfig`, `GenericConfig`, `DeliveryConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

/// Success color used when neither the record nor the environment sets one.
pub const DEFAULT_SUCCESS_COLOR: &str = "#dfdfdf";
/// Failure color used when neither the record nor the environment sets one.
pub const DEFAULT_FAIL_COLOR: &str = "#d50200";

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.chatops/config.json` + env vars.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Name of the adapter records are dispatched to.
    pub adapter: String,
    pub mattermost: MattermostConfig,
    pub generic: GenericConfig,
    pub delivery: DeliveryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            adapter: "mattermost".to_string(),
            mattermost: MattermostConfig::default(),
            generic: GenericConfig::default(),
            delivery: DeliveryConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────
// Backends
// ─────────────────────────────────────────────

/// Mattermost backend: incoming webhook plus status colors.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MattermostConfig {
    /// Incoming webhook URL. Empty means not configured.
    pub webhook_url: String,
    /// Display name override for posts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Avatar override for posts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Attachment color for successful executions.
    pub success_color: String,
    /// Attachment color when the body reports a failed status.
    pub fail_color: String,
}

impl Default for MattermostConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            username: None,
            icon_url: None,
            success_color: DEFAULT_SUCCESS_COLOR.to_string(),
            fail_color: DEFAULT_FAIL_COLOR.to_string(),
        }
    }
}

impl MattermostConfig {
    /// Whether a webhook endpoint is set.
    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }
}

/// Plain-text backend for chat systems without attachments.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenericConfig {
    /// Incoming webhook URL. Empty means not configured.
    pub webhook_url: String,
    /// Formatted bodies longer than this are truncated (characters).
    pub max_message_length: usize,
}

impl Default for GenericConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            max_message_length: 500,
        }
    }
}

impl GenericConfig {
    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }
}

// ─────────────────────────────────────────────
// Delivery
// ─────────────────────────────────────────────

/// Chunking and pacing shared by every adapter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryConfig {
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    /// Delay between consecutive chunks of one notification, in milliseconds.
    pub pacing_ms: u64,
    /// Capacity of the notification bus.
    pub bus_capacity: usize,
    /// Upper bound on one webhook request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            chunk_size: 3800,
            pacing_ms: 300,
            bus_capacity: 100,
            request_timeout_secs: 30,
        }
    }
}

impl DeliveryConfig {
    pub fn pacing(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.pacing_ms)
    }

    /// Request timeout; zero is bumped to one second.
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

//! Routing and status-color decisions shared by every adapter.

use chatops_core::{Envelope, NotificationRecord};

/// Literal the upstream pipeline prints for a failed execution.
///
/// Matching is a plain case-sensitive substring search, so a body that merely
/// quotes this text is also treated as a failure.
pub const FAILURE_MARKER: &str = "status : failed";

/// Where a record goes and how its first line is addressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Routing {
    pub envelope: Envelope,
    /// `"@user: "` for channel posts addressed to a user, otherwise empty.
    pub mention: String,
}

/// Resolve the delivery target for a record.
///
/// Whispered records with a user go straight to that user with no mention.
/// Everything else goes to the channel, mentioning the user when one is set.
pub fn resolve_routing(record: &NotificationRecord) -> Routing {
    match record.addressee() {
        Some(user) if record.whisper => Routing {
            envelope: Envelope::direct(user),
            mention: String::new(),
        },
        Some(user) => Routing {
            envelope: Envelope::new(record.channel.as_str()),
            mention: format!("@{user}: "),
        },
        None => Routing {
            envelope: Envelope::new(record.channel.as_str()),
            mention: String::new(),
        },
    }
}

/// Attachment colors for the two execution outcomes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusColors {
    pub success: String,
    pub failure: String,
}

impl StatusColors {
    pub fn new(success: impl Into<String>, failure: impl Into<String>) -> Self {
        StatusColors {
            success: success.into(),
            failure: failure.into(),
        }
    }

    /// Pick the color for a record.
    ///
    /// An explicit `extra.color` always wins. Otherwise the body is assumed to
    /// report success unless it contains [`FAILURE_MARKER`].
    pub fn resolve(&self, record: &NotificationRecord) -> String {
        if let Some(color) = record.explicit_color() {
            return color.to_string();
        }

        if record.message.contains(FAILURE_MARKER) {
            self.failure.clone()
        } else {
            self.success.clone()
        }
    }
}

impl From<&chatops_core::config::schema::MattermostConfig> for StatusColors {
    fn from(cfg: &chatops_core::config::schema::MattermostConfig) -> Self {
        StatusColors::new(cfg.success_color.as_str(), cfg.fail_color.as_str())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

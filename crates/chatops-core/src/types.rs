//! Core types — notification records coming in, rendered chat messages going out.
//!
//! A `NotificationRecord` is what the upstream automation pipeline hands us.
//! Adapters turn one record into one `Envelope` plus an ordered list of
//! `RenderedChunk`s, each of which becomes an `OutgoingMessage` on the wire.
//!
//! Style overrides stay as loose JSON on purpose: legacy callers control the
//! whole attachment shape (author, title, links, custom fields) and we must
//! pass it through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;

/// Open key/value overlay merged on top of an adapter's default presentation.
pub type StyleOverrides = Map<String, Value>;

// ─────────────────────────────────────────────
// Notification input
// ─────────────────────────────────────────────

/// A notification produced by the upstream pipeline.
///
/// Adapters only ever borrow a record; it is never mutated after receipt.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationRecord {
    /// Raw message text.
    #[serde(default)]
    pub message: String,
    /// Target channel, used unless the record is whispered to a user.
    #[serde(default)]
    pub channel: String,
    /// Target user, for direct delivery or an @-mention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Deliver as a direct message to `user` instead of the channel.
    #[serde(default)]
    pub whisper: bool,
    /// Optional presentation hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Extra>,
}

impl NotificationRecord {
    /// Create a record addressed to a channel.
    pub fn new(channel: impl Into<String>, message: impl Into<String>) -> Self {
        NotificationRecord {
            message: message.into(),
            channel: channel.into(),
            ..Default::default()
        }
    }

    /// Set the target user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Mark the record for direct delivery.
    pub fn whispered(mut self) -> Self {
        self.whisper = true;
        self
    }

    /// Attach presentation hints.
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Parse one JSON document (e.g. a line of a JSON-lines stream).
    pub fn from_json(raw: &str) -> Result<Self, RecordError> {
        let record: NotificationRecord = serde_json::from_str(raw.trim())?;
        Ok(record)
    }

    /// The addressed user, treating an empty string as absent.
    pub fn addressee(&self) -> Option<&str> {
        self.user.as_deref().filter(|u| !u.is_empty())
    }

    /// Explicit color from `extra.color`, if set and non-empty.
    pub fn explicit_color(&self) -> Option<&str> {
        self.extra.as_ref().and_then(|e| e.color())
    }

    /// Platform-specific style overrides from `extra.<platform>`.
    pub fn style_overrides(&self, platform: &str) -> Option<&StyleOverrides> {
        self.extra.as_ref().and_then(|e| e.overrides(platform))
    }
}

/// The `extra` block of a record: an optional color plus per-platform overrides.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Extra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Everything else, keyed by platform name (e.g. `"mattermost"`).
    #[serde(flatten)]
    pub platforms: Map<String, Value>,
}

impl Extra {
    /// Build an `extra` block carrying only a color.
    pub fn colored(color: impl Into<String>) -> Self {
        Extra {
            color: Some(color.into()),
            platforms: Map::new(),
        }
    }

    /// Add overrides for one platform.
    pub fn with_platform(mut self, platform: impl Into<String>, overrides: StyleOverrides) -> Self {
        self.platforms.insert(platform.into(), Value::Object(overrides));
        self
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref().filter(|c| !c.is_empty())
    }

    /// Overrides for `platform`. Non-object values are ignored.
    pub fn overrides(&self, platform: &str) -> Option<&StyleOverrides> {
        self.platforms.get(platform).and_then(Value::as_object)
    }
}

// ─────────────────────────────────────────────
// Routing + output
// ─────────────────────────────────────────────

/// Resolved delivery target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Channel name, or the user name for direct messages.
    pub room: String,
    /// The room is a user, not a channel.
    #[serde(default)]
    pub direct: bool,
}

impl Envelope {
    /// Target a channel.
    pub fn new(room: impl Into<String>) -> Self {
        Envelope {
            room: room.into(),
            direct: false,
        }
    }

    /// Target a user directly.
    pub fn direct(user: impl Into<String>) -> Self {
        Envelope {
            room: user.into(),
            direct: true,
        }
    }
}

/// Message properties carried next to the top-level text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageProps {
    pub attachments: Vec<Value>,
}

/// The abstract shape handed to a `Transport`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub props: MessageProps,
    /// Top-level text; `None` on follow-up chunks.
    pub message: Option<String>,
}

impl OutgoingMessage {
    /// A plain text message without attachments.
    pub fn plain(text: impl Into<String>) -> Self {
        OutgoingMessage {
            props: MessageProps::default(),
            message: Some(text.into()),
        }
    }

    /// A message carrying attachments and optional top-level text.
    pub fn with_attachments(attachments: Vec<Value>, message: Option<String>) -> Self {
        OutgoingMessage {
            props: MessageProps { attachments },
            message,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.props.attachments.is_empty()
    }
}

/// One outbound unit of a chunked delivery.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedChunk {
    /// Position in the split sequence.
    pub index: usize,
    /// The body substring carried by this chunk.
    pub text: String,
    /// Attachments sent with this chunk.
    pub attachment_payload: Vec<Value>,
    /// Top-level text; only ever set on the first chunk.
    pub greeting: Option<String>,
    pub routing: Envelope,
}

impl RenderedChunk {
    /// Convert to the wire shape handed to the transport.
    pub fn to_message(&self) -> OutgoingMessage {
        OutgoingMessage::with_attachments(self.attachment_payload.clone(), self.greeting.clone())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

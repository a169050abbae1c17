//! Text formatting and chunk splitting.
//!
//! Two collaborators sit between a raw notification body and the chunks an
//! adapter delivers:
//! - `TextFormatter` turns raw text into the backend's markup
//! - `ChunkSplitter` pulls the pretext out and cuts the body into
//!   backend-sized pieces
//!
//! A body may carry a pretext ahead of the [`PRETEXT_DELIMITER`] marker, e.g.
//! `"Deploy finished{~}host-1: ok\nhost-2: ok"`.

use regex::Regex;

use chatops_core::utils::truncate_string;

/// Separates the pretext from the body.
pub const PRETEXT_DELIMITER: &str = "{~}";

/// Default maximum chunk length, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 3800;

// ─────────────────────────────────────────────
// Formatters
// ─────────────────────────────────────────────

/// Converts raw notification text into backend markup. Must be total.
pub trait TextFormatter: Send + Sync {
    fn format(&self, raw: &str) -> String;
}

/// Formatter for backends that render Markdown inside attachments.
///
/// The body ends up in an attachment, which renders Markdown natively, so the
/// text is neither truncated nor rewritten.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttachmentFormatter;

impl TextFormatter for AttachmentFormatter {
    fn format(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Formatter for plain-text backends: strips Markdown.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainFormatter;

impl TextFormatter for PlainFormatter {
    fn format(&self, raw: &str) -> String {
        markdown_to_plain(raw)
    }
}

/// Strip Markdown syntax that plain-text chats would show literally.
///
/// - Code fences (```) → fence lines removed, content kept
/// - Inline code (`x`) → `x`
/// - Bold (** / __) → text
/// - Headers (# ...) → text
/// - Links [text](url) → `text (url)`
///
/// The pretext delimiter is left alone.
pub fn markdown_to_plain(text: &str) -> String {
    // 1. Code fences, keep the content
    let re_fence = Regex::new(r"(?m)^```\w*[ \t]*\n?").unwrap();
    let text = re_fence.replace_all(text, "");

    // 2. Inline code
    let re_inline = Regex::new(r"`([^`\n]+)`").unwrap();
    let text = re_inline.replace_all(&text, "$1");

    // 3. Headers
    let re_headers = Regex::new(r"(?m)^#{1,6}\s+(.+)$").unwrap();
    let text = re_headers.replace_all(&text, "$1");

    // 4. Bold
    let re_bold_star = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    let text = re_bold_star.replace_all(&text, "$1");
    let re_bold_under = Regex::new(r"__(.+?)__").unwrap();
    let text = re_bold_under.replace_all(&text, "$1");

    // 5. Links
    let re_links = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
    let text = re_links.replace_all(&text, "$1 ($2)");

    text.into_owned()
}

// ─────────────────────────────────────────────
// Splitters
// ─────────────────────────────────────────────

/// Result of splitting a formatted message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitMessage {
    /// Body chunks in order; `None` when there is no body to attach.
    pub text: Option<Vec<String>>,
    /// Lead-in text pulled out ahead of the body.
    pub pretext: String,
}

/// Splits formatted text into a pretext and bounded body chunks.
pub trait ChunkSplitter: Send + Sync {
    fn split(&self, text: &str) -> SplitMessage;
}

/// Splitter honoring the `{~}` pretext marker.
///
/// Only the first marker counts; later ones stay in the body. Without a
/// marker the whole text is body and the pretext is empty.
///
/// An optional body limit truncates the body (never the pretext) before it
/// is chunked.
#[derive(Clone, Debug)]
pub struct PretextSplitter {
    chunk_size: usize,
    body_limit: Option<usize>,
}

impl PretextSplitter {
    /// A `chunk_size` of zero is bumped to one character.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            body_limit: None,
        }
    }

    /// Cap the body at `max_chars` characters, marking the cut with "...".
    pub fn with_body_limit(mut self, max_chars: usize) -> Self {
        self.body_limit = Some(max_chars);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for PretextSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkSplitter for PretextSplitter {
    fn split(&self, text: &str) -> SplitMessage {
        let (pretext, body) = match text.split_once(PRETEXT_DELIMITER) {
            Some((pretext, body)) => (pretext, body),
            None => ("", text),
        };

        let chunks = match self.body_limit {
            Some(limit) => chunk_text(&truncate_string(body, limit), self.chunk_size),
            None => chunk_text(body, self.chunk_size),
        };
        SplitMessage {
            text: if chunks.is_empty() { None } else { Some(chunks) },
            pretext: pretext.to_string(),
        }
    }
}

/// Cut `text` into consecutive runs of at most `max_chars` characters.
///
/// Cuts land on char boundaries only, so joining the chunks gives back the
/// input exactly. Empty input yields no chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        let split_at = remaining
            .char_indices()
            .nth(max_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(remaining.len());

        let (chunk, rest) = remaining.split_at(split_at);
        chunks.push(chunk.to_string());
        remaining = rest;
    }

    chunks
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

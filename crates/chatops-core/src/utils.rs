//! Small helpers shared by the config loader and the adapters.

use std::path::PathBuf;

/// Directory under the home directory holding chatops state.
pub const DATA_DIR_NAME: &str = ".chatops";

const ELLIPSIS: &str = "...";

/// The chatops data directory, `~/.chatops`.
///
/// Falls back to the working directory when no home directory is known.
pub fn get_data_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

/// Cap `s` at `max_len` characters, marking a cut with "...".
///
/// Counts chars, not bytes. The result never exceeds `max_len` characters;
/// limits too small to fit the marker cut without it.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }

    let marker = ELLIPSIS.len();
    if max_len <= marker {
        return s.chars().take(max_len).collect();
    }

    let mut out: String = s.chars().take(max_len - marker).collect();
    out.push_str(ELLIPSIS);
    out
}

//! Config loader — reads `~/.chatops/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.chatops/config.json`
//! 3. Environment variables (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `ST2_MATTERMOST_SUCCESS_COLOR` → `mattermost.success_color`
/// - `ST2_MATTERMOST_FAIL_COLOR` → `mattermost.fail_color`
/// - `CHATOPS_ADAPTER` → `adapter`
/// - `CHATOPS_MATTERMOST__WEBHOOK_URL` → `mattermost.webhook_url`
/// - `CHATOPS_MATTERMOST__USERNAME` → `mattermost.username`
/// - `CHATOPS_MATTERMOST__ICON_URL` → `mattermost.icon_url`
/// - `CHATOPS_GENERIC__WEBHOOK_URL` → `generic.webhook_url`
/// - `CHATOPS_GENERIC__MAX_MESSAGE_LENGTH` → `generic.max_message_length`
/// - `CHATOPS_DELIVERY__CHUNK_SIZE` → `delivery.chunk_size`
/// - `CHATOPS_DELIVERY__PACING_MS` → `delivery.pacing_ms`
fn apply_env_overrides(mut config: Config) -> Config {
    // Colors keep the names the upstream pipeline already exports.
    if let Ok(val) = std::env::var("ST2_MATTERMOST_SUCCESS_COLOR") {
        if !val.is_empty() {
            config.mattermost.success_color = val;
        }
    }
    if let Ok(val) = std::env::var("ST2_MATTERMOST_FAIL_COLOR") {
        if !val.is_empty() {
            config.mattermost.fail_color = val;
        }
    }

    if let Ok(val) = std::env::var("CHATOPS_ADAPTER") {
        config.adapter = val;
    }

    // Mattermost
    if let Ok(val) = std::env::var("CHATOPS_MATTERMOST__WEBHOOK_URL") {
        config.mattermost.webhook_url = val;
    }
    if let Ok(val) = std::env::var("CHATOPS_MATTERMOST__USERNAME") {
        config.mattermost.username = Some(val);
    }
    if let Ok(val) = std::env::var("CHATOPS_MATTERMOST__ICON_URL") {
        config.mattermost.icon_url = Some(val);
    }

    // Generic
    if let Ok(val) = std::env::var("CHATOPS_GENERIC__WEBHOOK_URL") {
        config.generic.webhook_url = val;
    }
    if let Ok(val) = std::env::var("CHATOPS_GENERIC__MAX_MESSAGE_LENGTH") {
        if let Ok(n) = val.parse::<usize>() {
            config.generic.max_message_length = n;
        }
    }

    // Delivery
    if let Ok(val) = std::env::var("CHATOPS_DELIVERY__CHUNK_SIZE") {
        match val.parse::<usize>() {
            Ok(n) if n > 0 => config.delivery.chunk_size = n,
            _ => warn!(value = %val, "ignoring invalid CHATOPS_DELIVERY__CHUNK_SIZE"),
        }
    }
    if let Ok(val) = std::env::var("CHATOPS_DELIVERY__PACING_MS") {
        if let Ok(ms) = val.parse::<u64>() {
            config.delivery.pacing_ms = ms;
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

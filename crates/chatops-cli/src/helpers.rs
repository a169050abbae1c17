//! Shared CLI helpers — path expansion, adapter wiring, report printing.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;

use chatops_adapters::{AdapterManager, DeliveryReport, GenericAdapter, MattermostAdapter, WebhookTransport};
use chatops_core::bus::NotificationBus;
use chatops_core::config::Config;
use chatops_core::Extra;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Fail early when the selected adapter has nowhere to post.
pub fn ensure_configured(config: &Config, adapter: &str) -> Result<()> {
    let configured = match adapter {
        chatops_adapters::mattermost::PLATFORM => config.mattermost.is_configured(),
        chatops_adapters::generic::PLATFORM => config.generic.is_configured(),
        other => bail!("unknown adapter '{other}' (expected mattermost or generic)"),
    };

    if !configured {
        bail!("adapter '{adapter}' has no webhook url; set {adapter}.webhookUrl in the config file");
    }
    Ok(())
}

/// Build a manager with every known adapter registered.
pub fn build_manager(config: &Config, bus: Arc<NotificationBus>) -> AdapterManager {
    let mattermost_transport = WebhookTransport::new(config.mattermost.webhook_url.as_str())
        .with_username(config.mattermost.username.clone())
        .with_icon_url(config.mattermost.icon_url.clone())
        .with_timeout(config.delivery.request_timeout());
    let generic_transport = WebhookTransport::new(config.generic.webhook_url.as_str())
        .with_timeout(config.delivery.request_timeout());

    let mut manager = AdapterManager::new(bus);
    manager.register(Arc::new(MattermostAdapter::from_config(config, Arc::new(mattermost_transport))));
    manager.register(Arc::new(GenericAdapter::from_config(config, Arc::new(generic_transport))));
    manager
}

/// Parse the `--extra` JSON object.
pub fn parse_extra(raw: &str) -> Result<Extra> {
    serde_json::from_str(raw).context("--extra must be a JSON object")
}

/// Print the outcome of one delivery.
pub fn print_report(report: &DeliveryReport) {
    let status = if report.is_complete() {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    };
    println!(
        "  {} {} message(s) to {} {}",
        status,
        report.sent,
        report.room.bold(),
        if report.failed > 0 {
            format!("({} failed)", report.failed).red().to_string()
        } else {
            String::new()
        }
    );
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

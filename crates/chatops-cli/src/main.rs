//! Chatops CLI — entry point.
//!
//! # Commands
//!
//! - `chatops send -c CHANNEL [-u USER] [--whisper] [--extra JSON] MESSAGE` — deliver one notification
//! - `chatops relay` — deliver JSON-lines notifications read from stdin
//! - `chatops init` — write a default config file
//! - `chatops status` — show configuration

mod helpers;
mod init;
mod relay;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use chatops_core::bus::NotificationBus;
use chatops_core::config::{load_config, Config};
use chatops_core::NotificationRecord;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Relay automation notifications into chat rooms
#[derive(Parser)]
#[command(name = "chatops", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.chatops/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deliver a single notification and wait for it to finish
    Send {
        /// Message body; `{~}` separates an optional pretext
        message: String,

        /// Target channel
        #[arg(short, long)]
        channel: String,

        /// User to mention (or to whisper to)
        #[arg(short, long)]
        user: Option<String>,

        /// Send directly to the user instead of the channel
        #[arg(long, default_value_t = false)]
        whisper: bool,

        /// Presentation hints as a JSON object
        #[arg(long)]
        extra: Option<String>,

        /// Adapter to use (overrides config)
        #[arg(short, long)]
        adapter: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Read JSON-lines notifications from stdin and deliver them
    Relay {
        /// Adapter to use (overrides config)
        #[arg(short, long)]
        adapter: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Write a default config file
    Init,

    /// Show configuration status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(helpers::expand_tilde);

    match cli.command {
        Commands::Send {
            message,
            channel,
            user,
            whisper,
            extra,
            adapter,
            logs,
        } => {
            init_logging(logs);
            let mut record = NotificationRecord::new(channel, message);
            record.user = user;
            record.whisper = whisper;
            if let Some(raw) = extra {
                record.extra = Some(helpers::parse_extra(&raw)?);
            }
            run_send(load(config_path), record, adapter).await
        }
        Commands::Relay { adapter, logs } => {
            init_logging(logs);
            relay::run(load(config_path), adapter).await
        }
        Commands::Init => init::run(config_path),
        Commands::Status => status::run(config_path),
    }
}

fn load(path: Option<PathBuf>) -> Config {
    load_config(path.as_deref())
}

// ─────────────────────────────────────────────
// Send command
// ─────────────────────────────────────────────

async fn run_send(config: Config, record: NotificationRecord, adapter: Option<String>) -> Result<()> {
    let adapter_name = adapter.unwrap_or_else(|| config.adapter.clone());
    helpers::ensure_configured(&config, &adapter_name)?;

    let bus = Arc::new(NotificationBus::new(1));
    let manager = helpers::build_manager(&config, bus);
    let adapter = manager
        .get(&adapter_name)
        .cloned()
        .with_context(|| format!("adapter '{adapter_name}' is not available"))?;

    info!(adapter = %adapter_name, channel = %record.channel, "sending notification");
    let report = chatops_adapters::dispatch(adapter, record)
        .await
        .context("delivery task failed")?;

    helpers::print_report(&report);
    if !report.is_complete() {
        anyhow::bail!("{} of {} message(s) failed", report.failed, report.attempted());
    }
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("chatops=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

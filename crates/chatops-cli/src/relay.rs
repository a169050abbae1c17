//! Relay command — feeds stdin notifications through the adapter manager.
//!
//! Startup sequence:
//! 1. Resolve and check the adapter
//! 2. Create the notification bus and manager
//! 3. Spawn the stdin reader (one JSON record per line, bus closed on EOF)
//! 4. Run the manager until the bus drains or Ctrl+C arrives

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use chatops_core::bus::NotificationBus;
use chatops_core::config::Config;
use chatops_core::NotificationRecord;

use crate::helpers;

/// Run the relay until stdin is exhausted or interrupted.
pub async fn run(config: Config, adapter: Option<String>) -> Result<()> {
    let adapter_name = adapter.unwrap_or_else(|| config.adapter.clone());
    helpers::ensure_configured(&config, &adapter_name)?;

    let bus = Arc::new(NotificationBus::new(config.delivery.bus_capacity.max(1)));
    let manager = helpers::build_manager(&config, bus.clone());

    let reader_bus = bus.clone();
    let reader = tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        read_records(stdin, &reader_bus).await
    });

    let shutdown = manager.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, stopping relay");
            shutdown.notify_one();
        }
    });

    let summary = manager.run(&adapter_name).await?;
    bus.close();
    reader.abort();

    println!(
        "  {} {} notification(s), {} message(s) sent{}",
        "✓".green(),
        summary.dispatched,
        summary.sent,
        if summary.failed > 0 {
            format!(", {} failed", summary.failed).red().to_string()
        } else {
            String::new()
        }
    );
    Ok(())
}

/// Publish one record per non-blank line, then close the bus.
///
/// Lines that do not parse are logged and skipped. Returns the number of
/// records published.
async fn read_records<R>(reader: R, bus: &NotificationBus) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut published = 0;
    let mut line_no = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read input");
                break;
            }
        };
        line_no += 1;

        if line.trim().is_empty() {
            continue;
        }

        match NotificationRecord::from_json(&line) {
            Ok(record) => {
                if bus.publish(record).await.is_err() {
                    debug!("bus closed, input reader stopping");
                    break;
                }
                published += 1;
            }
            Err(e) => warn!(line = line_no, error = %e, "skipping input line"),
        }
    }

    bus.close();
    published
}

//! `chatops status` — show configuration and adapter status.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use chatops_core::config::{get_config_path, load_config};

/// Run the status command.
pub fn run(path: Option<PathBuf>) -> Result<()> {
    let config_path = path.unwrap_or_else(get_config_path);
    let config = load_config(Some(&config_path));

    println!();
    println!("{}", "Chatops Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!("  {:<18} {}", "Adapter:".bold(), config.adapter);

    // Backends
    println!();
    println!("  {}", "Backends:".bold());
    for (name, configured, url) in [
        ("mattermost", config.mattermost.is_configured(), &config.mattermost.webhook_url),
        ("generic", config.generic.is_configured(), &config.generic.webhook_url),
    ] {
        let status = if configured {
            format!("{} {}", "✓".green(), url)
        } else {
            format!("{}", "· not configured".dimmed())
        };
        let marker = if name == config.adapter { "*" } else { " " };
        println!("   {marker}{:<20} {}", name, status);
    }

    // Presentation
    println!();
    println!(
        "  {:<18} success {} | failure {}",
        "Colors:".bold(),
        config.mattermost.success_color,
        config.mattermost.fail_color
    );
    println!(
        "  {:<18} {} chars/chunk, {} ms between chunks",
        "Delivery:".bold(),
        config.delivery.chunk_size,
        config.delivery.pacing_ms
    );
    println!();

    Ok(())
}

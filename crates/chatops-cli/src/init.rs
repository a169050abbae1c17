//! `chatops init` — write a default configuration file.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use chatops_core::config::{get_config_path, load_config, save_config};

/// Run the init command.
pub fn run(path: Option<PathBuf>) -> Result<()> {
    let config_path = path.unwrap_or_else(get_config_path);

    println!();
    println!("{}", "Chatops — Setup".cyan().bold());
    println!();

    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        // Defaults plus whatever the environment already provides.
        let config = load_config(Some(&config_path));
        save_config(&config, Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    println!();
    println!(
        "  Next: set {} and try {}",
        "mattermost.webhookUrl".bold(),
        "chatops send -c town-square \"hello\"".cyan()
    );
    println!();

    Ok(())
}

//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up cubecana CLI defaults.

use crate::config::Config;
use anyhow::Result;

/// Handle the configure command
///
/// # Arguments
/// * `update` - Fields to set; unset fields are left alone
/// * `show` - If true, show current configuration
pub fn handle(update: Config, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if config.merge(update) {
        config.save()?;
        println!("Configuration updated");
        if let Ok(path) = Config::config_path() {
            println!("Config saved to: {}", path.display());
        }
    } else {
        show_usage();
    }

    Ok(())
}

fn describe(value: Option<String>) -> String {
    value.unwrap_or_else(|| "(not set)".to_string())
}

/// Display current configuration
fn show_config(config: &Config) {
    println!("Card cache:      {}", config.get_cache_path().display());
    println!(
        "Early access:    {}",
        describe(config.early_access_path.as_ref().map(|p| p.display().to_string()))
    );
    println!(
        "Canonical names: {}",
        describe(config.canonical_names_path.as_ref().map(|p| p.display().to_string()))
    );
    println!("Database:        {}", config.get_database_path().display());
    println!("Feed URL:        {}", config.get_feed_url());
    println!(
        "Ratings:         {}",
        describe(config.ratings_path.as_ref().map(|p| p.display().to_string()))
    );

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: cubecana configure --cache-path share/cards.json");
    println!("   or: cubecana configure --database-path share/cubes.db");
    println!("   or: cubecana configure --show");
    println!();
    println!("Other settings: --early-access-path, --canonical-names-path, --feed-url, --ratings-path");
}

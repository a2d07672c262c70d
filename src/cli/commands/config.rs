//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{CacheError, CacheResult};
use console::style;
use std::path::PathBuf;

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "content.max_entries",
    "content.max_total_mb",
    "content.temp_parent",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> CacheResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> CacheResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> CacheResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        println!(
            "{} Config already exists at {}",
            style("!").yellow(),
            path.display()
        );
        println!("  {}", style("Use --force to overwrite").dim());
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    println!(
        "{} Configuration initialized: {}",
        style("✓").green(),
        path.display()
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> CacheResult<()> {
    let mut config = config.clone();
    apply(&mut config, key, value)?;

    manager.save(&config).await?;
    println!("{} Set {} = {}", style("✓").green(), key, value);

    Ok(())
}

/// Apply one dot-separated `key = value` assignment
fn apply(config: &mut Config, key: &str, value: &str) -> CacheResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(CacheError::User(format!(
                    "Invalid log format: {}. Use text or json",
                    value
                )))
            }
        },
        ["content", "max_entries"] => config.content.max_entries = parse_number(value)?,
        ["content", "max_total_mb"] => config.content.max_total_mb = parse_number(value)?,
        ["content", "temp_parent"] => {
            config.content.temp_parent = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            }
        }
        _ => {
            return Err(CacheError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(value: &str) -> CacheResult<T> {
    value
        .parse()
        .map_err(|_| CacheError::User(format!("Invalid number: {}", value)))
}

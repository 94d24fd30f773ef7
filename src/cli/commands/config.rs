//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, LoadedConfig};
use crate::error::{ArcIndexError, ArcIndexResult};
use console::style;
use std::path::PathBuf;

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    manager: &ConfigManager,
    loaded: &LoadedConfig,
) -> ArcIndexResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(loaded)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let mut updated = loaded.config.clone();
            set_value(&mut updated, &key, &value)?;
            manager.save(&updated).await?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
        }
    }

    Ok(())
}

fn show_config(loaded: &LoadedConfig) -> ArcIndexResult<()> {
    println!("# {}", loaded.source);
    println!("{}", toml::to_string_pretty(&loaded.config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> ArcIndexResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        println!(
            "{} Config already exists at {}",
            style("!").yellow(),
            path.display()
        );
        println!("  Use --force to overwrite");
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    println!(
        "{} Configuration initialized ({})",
        style("✓").green(),
        path.display()
    );

    Ok(())
}

/// Apply a dot-separated key to `config`
fn set_value(config: &mut Config, key: &str, value: &str) -> ArcIndexResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(ArcIndexError::User(format!(
                    "Invalid log format: {}. Use text/json",
                    value
                )))
            }
        },
        ["cache", "enabled"] => config.cache.enabled = parse_bool(value)?,
        ["cache", "path"] => {
            config.cache.path = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        ["scan", "parallel"] => config.scan.parallel = parse_bool(value)?,
        ["archives", "locations"] => {
            config.archives.locations = value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        _ => {
            return Err(ArcIndexError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "cache.enabled",
    "cache.path",
    "scan.parallel",
    "archives.locations",
];

fn parse_bool(value: &str) -> ArcIndexResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ArcIndexError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

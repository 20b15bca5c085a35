mod cli;
mod config;
mod logging;
mod registry;

use anyhow::{Context, Result};
use colored::Colorize;
use log::error;
use std::path::PathBuf;
use std::process;

use crate::cli::{Args, Command};
use crate::config::ConfigManager;
use crate::logging::{LogConfig, LogDestination, LogFormat};
use crate::registry::{
    default_registry_path, is_api_compatible, InstalledPluginRegistry, PluginEntry, RegistryError,
};

fn main() {
    if let Err(e) = run() {
        // Caller-input failures print plainly; anything else is also logged
        let is_user_error = e
            .downcast_ref::<RegistryError>()
            .map(RegistryError::is_caller_error)
            .unwrap_or(false);

        if is_user_error {
            eprintln!("{}", e);
        } else {
            error!("Application error: {}", e);
            eprintln!("Error: {}", e);
        }

        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args();

    let config_manager = load_configuration(&args)?;

    let log_config = configure_logging(&args, &config_manager)?;
    logging::init_logger(log_config)?;

    let registry = InstalledPluginRegistry::open(resolve_registry_path(&args, &config_manager)?);

    match &args.command {
        Command::Install { name, api_version, slot } => {
            let entry = registry.install(name.clone(), api_version.clone(), slot.clone())?;
            println!("{} {}", "installed".green(), entry.to_coordinates());
        }
        Command::List { format } => match format.as_str() {
            "text" => {
                for entry in registry.list()? {
                    println!("{}", entry.to_coordinates());
                }
            }
            "json" => {
                let entries = registry.list()?;
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            other => anyhow::bail!("Invalid list format: {}. Valid options: text, json", other),
        },
        Command::Has { coordinates } => {
            let entry = PluginEntry::from_coordinates(coordinates)?;
            if registry.has(&entry)? {
                println!("{} {}", "installed".green(), entry.to_coordinates());
            } else {
                println!("{} {}", "not installed".red(), entry.to_coordinates());
                process::exit(1);
            }
        }
        Command::Remove { coordinates } => {
            let entry = PluginEntry::from_coordinates(coordinates)?;
            registry.remove(&entry)?;
            println!("{} {}", "removed".green(), entry.to_coordinates());
        }
        Command::Check { host_version, coordinates } => {
            let entry = PluginEntry::from_coordinates(coordinates)?;
            if is_api_compatible(host_version, &entry)? {
                println!(
                    "{} {} under host API {}",
                    "compatible".green(),
                    entry.to_coordinates(),
                    host_version
                );
            } else {
                println!(
                    "{} {} under host API {}",
                    "incompatible".red(),
                    entry.to_coordinates(),
                    host_version
                );
                process::exit(1);
            }
        }
    }

    Ok(())
}

/// Load configuration, preferring an explicit --config-file over discovery
fn load_configuration(args: &Args) -> Result<ConfigManager> {
    match &args.config_file {
        Some(path) => ConfigManager::load_from_file(path.clone()),
        None => ConfigManager::load(),
    }
}

/// Build the logging configuration from CLI flags with config-file fallback
fn configure_logging(args: &Args, config: &ConfigManager) -> Result<LogConfig> {
    let console_level = if args.verbose || args.quiet || args.debug {
        args.console_level()
    } else {
        config
            .get_log_level("logging", "level")?
            .unwrap_or(args.console_level())
    };

    let format = match &args.log_format {
        Some(format) => format.parse::<LogFormat>().map_err(anyhow::Error::msg)?,
        None => match config.get_value("logging", "format") {
            Some(format) => format.parse::<LogFormat>().map_err(anyhow::Error::msg)?,
            None => LogFormat::Text,
        },
    };

    let log_file = args
        .log_file
        .clone()
        .or_else(|| config.get_path("logging", "file-path"));

    let file_level = match &args.log_file_level {
        Some(level) => Some(logging::parse_log_level(level)?),
        None => config.get_log_level("logging", "file-level")?,
    };

    let (destination, file_level) = match log_file {
        Some(path) => (
            LogDestination::Both(path),
            Some(file_level.unwrap_or(log::LevelFilter::Debug)),
        ),
        None => (LogDestination::Console, None),
    };

    Ok(LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}

/// Registry file path: --registry-file, then config, then the default
fn resolve_registry_path(args: &Args, config: &ConfigManager) -> Result<PathBuf> {
    if let Some(path) = &args.registry_file {
        return Ok(path.clone());
    }
    if let Some(path) = config.get_path("registry", "file") {
        return Ok(path);
    }
    default_registry_path().context("Failed to resolve default registry path")
}

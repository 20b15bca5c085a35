// Logging module for plugman
// Structured logging over the `log` facade with text or JSON line output,
// console and/or file destinations, and independent levels per destination.

use log::{Level, LevelFilter};
use serde::Serialize;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use anyhow::{Context, Result};

/// Log output format options
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}. Valid options: text, json", s)),
        }
    }
}

/// Log destination options
#[derive(Debug, Clone, PartialEq)]
pub enum LogDestination {
    Console,
    File(PathBuf),
    Both(PathBuf),
}

/// JSON log record structure
#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    timestamp: String,
    level: String,
    message: &'a str,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub console_level: LevelFilter,
    pub file_level: Option<LevelFilter>,
    pub format: LogFormat,
    pub destination: LogDestination,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::Info,
            file_level: None,
            format: LogFormat::Text,
            destination: LogDestination::Console,
        }
    }
}

/// Logger writing to the configured destinations
struct PlugmanLogger {
    config: LogConfig,
}

impl PlugmanLogger {
    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    fn format_record(&self, level: Level, message: &str) -> String {
        match self.config.format {
            LogFormat::Text => format!(
                "{} [{}] {}",
                Self::timestamp(),
                level.to_string().to_uppercase(),
                message
            ),
            LogFormat::Json => {
                let record = JsonRecord {
                    timestamp: Self::timestamp(),
                    level: level.to_string().to_uppercase(),
                    message,
                };
                serde_json::to_string(&record).unwrap_or_else(|_| message.to_string())
            }
        }
    }

    fn console_enabled(&self, level: Level) -> bool {
        let to_console = matches!(
            self.config.destination,
            LogDestination::Console | LogDestination::Both(_)
        );
        to_console && level <= self.config.console_level
    }

    fn file_enabled(&self, level: Level) -> bool {
        let to_file = matches!(
            self.config.destination,
            LogDestination::File(_) | LogDestination::Both(_)
        );
        to_file && self.config.file_level.map_or(false, |f| level <= f)
    }

    fn file_path(&self) -> Option<&PathBuf> {
        match &self.config.destination {
            LogDestination::Console => None,
            LogDestination::File(path) | LogDestination::Both(path) => Some(path),
        }
    }

    fn append_to_file(path: &PathBuf, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        writeln!(file, "{}", line).context("Failed to write to log file")
    }
}

impl log::Log for PlugmanLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.console_enabled(metadata.level()) || self.file_enabled(metadata.level())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.format_record(record.level(), &record.args().to_string());

        if self.console_enabled(record.level()) {
            if let Err(e) = writeln!(io::stderr(), "{}", line) {
                eprintln!("Console logging error: {}", e);
            }
        }
        if self.file_enabled(record.level()) {
            if let Some(path) = self.file_path() {
                if let Err(e) = Self::append_to_file(path, &line) {
                    eprintln!("File logging error: {}", e);
                }
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logger(config: LogConfig) -> Result<()> {
    let max_level = match config.file_level {
        Some(file_level) if file_level > config.console_level => file_level,
        _ => config.console_level,
    };

    log::set_boxed_logger(Box::new(PlugmanLogger { config }))
        .context("Failed to set global logger")?;
    log::set_max_level(max_level);
    Ok(())
}

/// Convert string to LevelFilter
pub fn parse_log_level(level_str: &str) -> Result<LevelFilter> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        "off" => Ok(LevelFilter::Off),
        _ => Err(anyhow::anyhow!(
            "Invalid log level: {}. Valid levels: error, warn, info, debug, trace, off",
            level_str
        )),
    }
}

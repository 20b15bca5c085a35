use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result};
use toml::Value;
use log::debug;

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Configuration manager
///
/// Loads a TOML file from the discovery hierarchy and exposes string
/// values with typed getters. Recognized sections are `[registry]`
/// (`file`) and `[logging]` (`level`, `format`, `file-path`,
/// `file-level`); CLI flags always take precedence over file values.
pub struct ConfigManager {
    config: Configuration,
    config_file_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a ConfigManager from an in-memory Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            config_file_path: None,
        }
    }

    /// Load configuration using the discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");

        for path in discover_config_files() {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        debug!("No configuration file found, using empty configuration");
        Ok(Self {
            config: Configuration::new(),
            config_file_path: None,
        })
    }

    /// Load configuration from an explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(Self {
            config,
            config_file_path: Some(path),
        })
    }

    /// Path of the loaded configuration file, if any
    pub fn config_file_path(&self) -> Option<&PathBuf> {
        self.config_file_path.as_ref()
    }

    /// Get a value from a configuration section
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        self.config.get(section).and_then(|s| s.get(key))
    }

    /// Get a log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }

    /// Get a path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }
}

/// Candidate configuration file paths, in priority order
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("plugman.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("plugman").join("config.toml"));
    }
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".plugman.toml"));
    }

    paths
}

/// Parse TOML content into the section -> key -> value map. Nested tables
/// beyond one level and non-scalar values are rejected.
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let parsed: Value = content.parse::<Value>().context("Invalid TOML syntax")?;
    let table = parsed
        .as_table()
        .context("Configuration root must be a table")?;

    let mut config = Configuration::new();
    for (section_name, section_value) in table {
        let section_table = section_value
            .as_table()
            .with_context(|| format!("Configuration section '{}' must be a table", section_name))?;

        let mut section = HashMap::new();
        for (key, value) in section_table {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Integer(i) => i.to_string(),
                Value::Float(f) => f.to_string(),
                Value::Boolean(b) => b.to_string(),
                other => anyhow::bail!(
                    "Unsupported value type for {}.{}: {}",
                    section_name,
                    key,
                    other.type_str()
                ),
            };
            section.insert(key.clone(), text);
        }
        config.insert(section_name.clone(), section);
    }

    Ok(config)
}

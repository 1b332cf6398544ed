use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use toml::Value;

use crate::toast::{DurationLevel, DurationTable, HostConfig};

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Section holding the toast host settings
pub const TOASTS_SECTION: &str = "toasts";

/// Configuration manager
#[derive(Debug)]
pub struct ConfigManager {
    config: Configuration,
    config_file_path: Option<PathBuf>,
    selected_section: Option<String>,
}

impl ConfigManager {
    /// Create a new ConfigManager from a Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            config_file_path: None,
            selected_section: None,
        }
    }

    /// Load configuration using discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");

        for path in discover_config_files() {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(path);
            }
        }

        info!("No configuration file found, using defaults");
        Ok(Self::from_config(Configuration::new()))
    }

    /// Load configuration from explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(Self {
            config,
            config_file_path: Some(path),
            selected_section: None,
        })
    }

    /// Path of the file this configuration came from, if any
    pub fn config_file_path(&self) -> Option<&PathBuf> {
        self.config_file_path.as_ref()
    }

    /// Get value from configuration with section fallback
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        // Priority: selected_section -> specified section -> base
        if let Some(selected) = &self.selected_section {
            if let Some(value) = self.config.get(selected).and_then(|s| s.get(key)) {
                return Some(value);
            }
        }

        if let Some(value) = self.config.get(section).and_then(|s| s.get(key)) {
            return Some(value);
        }

        self.config.get("base").and_then(|s| s.get(key))
    }

    /// Select configuration section for --config-name
    pub fn select_section(&mut self, section: String) {
        debug!("Selecting configuration section: {}", section);
        self.selected_section = Some(section);
    }

    /// Get boolean value with type conversion
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        match self.get_value(section, key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(anyhow::anyhow!("Invalid boolean value for {}.{}: {}", section, key, value)),
            },
            None => Ok(None),
        }
    }

    /// Get unsigned integer value with type conversion
    pub fn get_usize(&self, section: &str, key: &str) -> Result<Option<usize>> {
        match self.get_value(section, key) {
            Some(value) => value
                .parse::<usize>()
                .map(Some)
                .with_context(|| format!("Invalid number for {}.{}: {}", section, key, value)),
            None => Ok(None),
        }
    }

    /// Get a timeout in milliseconds; `never` disables the timeout
    pub fn get_timeout(&self, section: &str, key: &str) -> Result<Option<Option<Duration>>> {
        match self.get_value(section, key) {
            Some(value) if value.eq_ignore_ascii_case("never") => Ok(Some(None)),
            Some(value) => value
                .parse::<u64>()
                .map(|ms| Some(Some(Duration::from_millis(ms))))
                .with_context(|| {
                    format!("Invalid timeout for {}.{}: {} (milliseconds or \"never\")", section, key, value)
                }),
            None => Ok(None),
        }
    }

    /// Get log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }

    /// Get path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }

    /// Build the toast host settings from the `[toasts]` section
    pub fn get_host_config(&self) -> Result<HostConfig> {
        let mut config = HostConfig::default();

        if let Some(max_visible) = self.get_usize(TOASTS_SECTION, "max-visible")? {
            config = config.with_max_visible(max_visible);
        }
        if let Some(dismissible) = self.get_bool(TOASTS_SECTION, "dismissible")? {
            config = config.with_dismissible(dismissible);
        }
        if let Some(capacity) = self.get_usize(TOASTS_SECTION, "event-capacity")? {
            config = config.with_event_capacity(capacity);
        }

        let mut table = DurationTable::default();
        for (key, level) in [
            ("short-ms", DurationLevel::Short),
            ("medium-ms", DurationLevel::Medium),
            ("long-ms", DurationLevel::Long),
            ("indefinite-ms", DurationLevel::Indefinite),
        ] {
            if let Some(timeout) = self.get_timeout(TOASTS_SECTION, key)? {
                table = table.with(level, timeout);
            }
        }
        debug!("Duration table from configuration: {:?}", table);
        config = config.with_resolver(table);

        config
            .validate()
            .with_context(|| "Toast configuration validation failed")?;

        Ok(config)
    }
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Environment variable $TOASTHOST_CONFIG
    if let Ok(env_path) = env::var("TOASTHOST_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    // 2. XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("toasthost").join("config.toml"));
    }

    // 3. Home directory
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".toasthost.toml"));
    }

    // 4. Project local
    paths.push(PathBuf::from("./.toasthost.toml"));

    debug!("Config discovery paths: {:?}", paths);
    paths
}

/// Parse TOML content to string-based configuration
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let toml_value: Value = content.parse().context("Failed to parse TOML content")?;

    let mut config = Configuration::new();

    if let Value::Table(table) = toml_value {
        flatten_toml_table(&table, String::new(), &mut config);
    }

    debug!("Parsed configuration: {:?}", config);
    Ok(config)
}

/// Recursively flatten TOML tables into section.subsection format
fn flatten_toml_table(table: &toml::Table, prefix: String, config: &mut Configuration) {
    for (key, value) in table {
        let section_name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Table(subtable) if subtable.values().all(|v| !v.is_table()) => {
                let section = config.entry(section_name).or_default();
                for (subkey, subvalue) in subtable {
                    section.insert(subkey.clone(), toml_value_to_string(subvalue));
                }
            }
            Value::Table(subtable) => flatten_toml_table(subtable, section_name, config),
            _ => {
                // Top-level keys land in the base section
                config
                    .entry("base".to_string())
                    .or_default()
                    .insert(key.clone(), toml_value_to_string(value));
            }
        }
    }
}

/// Convert TOML Value to string representation
fn toml_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(_) | Value::Table(_) | Value::Datetime(_) => value.to_string(),
    }
}

//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use skylog_types::IconStyle;
use tracing::warn;

use crate::cli::ConfigKey;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Default length of the date range attached to a lookup, in days.
pub const DEFAULT_RANGE_DAYS: u32 = 5;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Snapshot file path (defaults to the platform data directory)
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// How icons are captured
    #[serde(default)]
    pub icon_style: IconStyle,

    /// Weather request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Default date range length in days
    #[serde(default = "default_range_days")]
    pub range_days: u32,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

fn default_range_days() -> u32 {
    DEFAULT_RANGE_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            database: None,
            icon_style: IconStyle::default(),
            timeout: DEFAULT_TIMEOUT,
            range_days: DEFAULT_RANGE_DAYS,
            no_color: false,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skylog")
            .join("config.toml")
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        warn!("Failed to parse config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Update one key from its string form.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ConfigKey::ApiKey => self.api_key = non_empty(value),
            ConfigKey::Database => self.database = non_empty(value).map(PathBuf::from),
            ConfigKey::IconStyle => {
                self.icon_style = value
                    .parse()
                    .with_context(|| format!("Invalid icon style '{}'", value))?;
            }
            ConfigKey::Timeout => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("'{}' is not a valid number of seconds", value))?;
                if secs == 0 {
                    bail!("Timeout must be at least 1 second");
                }
                self.timeout = secs;
            }
            ConfigKey::RangeDays => {
                self.range_days = value
                    .parse()
                    .with_context(|| format!("'{}' is not a valid number of days", value))?;
            }
            ConfigKey::NoColor => self.no_color = parse_bool_arg(value)?,
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse boolean argument with flexible input
fn parse_bool_arg(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => bail!(
            "Invalid boolean value '{}'. Use: true/false, yes/no, on/off, 1/0",
            s
        ),
    }
}

/// Resolve the API key: environment, then config.
pub fn resolve_api_key(env_key: Option<String>, config: &Config) -> Option<String> {
    env_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| config.api_key.clone())
}

/// Resolve the snapshot path: flag or environment, then config, then the
/// platform default.
pub fn resolve_database(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.or_else(|| config.database.clone())
        .unwrap_or_else(skylog_store::default_db_path)
}

/// Resolve timeout: explicit value, then config
pub fn resolve_timeout(arg: Option<u64>, config: &Config) -> u64 {
    arg.unwrap_or(config.timeout)
}

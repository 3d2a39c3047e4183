//! Engine configuration
//!
//! Layers, lowest precedence first: built-in defaults, a TOML or JSON file,
//! then `TIERS_*` environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tiers_core::error::{TiersError, TiersResult};
use tiers_core::tree::TreeConfig;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = TiersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(TiersError::config(format!(
                "Unknown log format '{other}', expected pretty, compact or json"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, compact, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Merge with another logging config
    ///
    /// Fields left at their default in `other` keep the current value.
    pub fn merge(&mut self, other: LoggingConfig) {
        let defaults = LoggingConfig::default();

        if !other.level.is_empty() && other.level != defaults.level {
            self.level = other.level;
        }

        if other.format != defaults.format {
            self.format = other.format;
        }
    }
}

/// Everything needed to stand up a settings engine, apart from the tree
/// itself and the persistence backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    pub tree: TreeConfig,
}

impl EngineConfig {
    /// Merge with another config, `other` wins where it sets a value
    pub fn merge(&mut self, other: EngineConfig) {
        self.logging.merge(other.logging);
        self.tree.merge(other.tree);
    }

    /// Load a file and apply environment overrides on top
    pub fn load(path: &Path) -> TiersResult<Self> {
        let mut config = load_from_file(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `TIERS_LOG_LEVEL`, `TIERS_LOG_FORMAT` and `TIERS_TREE_MAX_DEPTH`
    pub fn apply_env_overrides(&mut self) -> TiersResult<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> TiersResult<()> {
        if let Some(level) = lookup("TIERS_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("TIERS_LOG_FORMAT") {
            self.logging.format = format.parse().map_err(|_| {
                TiersError::config_with_context(
                    "Invalid TIERS_LOG_FORMAT value",
                    format!("Parsing log format '{format}'"),
                )
            })?;
        }

        if let Some(depth) = lookup("TIERS_TREE_MAX_DEPTH") {
            let max_depth: usize = depth.trim().parse().map_err(|_| {
                TiersError::config_with_context(
                    "Invalid TIERS_TREE_MAX_DEPTH value",
                    format!("Parsing maximum tree depth '{depth}'"),
                )
            })?;
            self.tree.max_depth = Some(max_depth);
        }

        Ok(())
    }
}

/// Load configuration from a file
///
/// TOML for `.toml`, JSON otherwise. Returns the default config if the file
/// doesn't exist.
pub fn load_from_file(path: &Path) -> TiersResult<EngineConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no engine config file, using defaults");
        return Ok(EngineConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        TiersError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            TiersError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            TiersError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}

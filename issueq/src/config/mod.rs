//! Configuration management for issueq
//!
//! Default config location: ~/.issueq/config.toml

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Settings for the streaming entry point.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ParserConfig {
    /// Largest token (plus any buffered separators) the streaming scanner
    /// will hold before giving up. Unset means unbounded, so streaming input
    /// is accepted exactly like in-memory input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_token_size: Option<usize>,
    /// Initial read buffer size in bytes (default: 4KiB)
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
}

pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

fn default_read_buffer_size() -> usize {
    DEFAULT_READ_BUFFER_SIZE
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_token_size: None,
            read_buffer_size: default_read_buffer_size(),
        }
    }
}

impl ParserConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.read_buffer_size == 0 {
            return Err(crate::Error::Config(
                "parser.read_buffer_size must be at least 1".to_string(),
            ));
        }
        if let Some(max) = self.max_token_size {
            if max < self.read_buffer_size {
                return Err(crate::Error::Config(format!(
                    "parser.max_token_size ({}) is smaller than parser.read_buffer_size ({})",
                    max, self.read_buffer_size
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level filter string
    /// Override with RUST_LOG env var
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// How a parsed query is rendered by front ends.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Text => "text",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "text" => Ok(OutputFormat::Text),
            other => Err(crate::Error::Config(format!(
                "unknown output format '{}' (expected json, yaml or text)",
                other
            ))),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".issueq")
}

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
        Ok(home.join(rest))
    } else if s == "~" {
        dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))
    } else {
        Ok(path.to_path_buf())
    }
}

impl Config {
    /// Path of the default config file (~/.issueq/config.toml)
    pub fn default_path() -> PathBuf {
        default_config_dir().join("config.toml")
    }

    /// Load config from default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from a file path; a missing file yields the defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_path = expand_tilde(config_path)?;
        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            Config::default()
        };

        config.parser.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

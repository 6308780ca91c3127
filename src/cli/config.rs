//! Configuration discovery and loading
//!
//! Discovery hierarchy, first match wins:
//! 1. Current directory: ./taskboard.toml or ./.taskboard/config.toml
//! 2. User config: ~/.taskboard/config.toml
//! 3. System config: /etc/taskboard/config.toml
//! 4. Built-in defaults

use crate::{env, task::RegistryConfig};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskboardConfig {
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by RUST_LOG
    pub filter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: env::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TaskboardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TaskboardConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.registry.initial_capacity == 0 {
            bail!("registry.initial_capacity must be at least 1");
        }
        if self.logging.filter.trim().is_empty() {
            bail!("logging.filter must not be empty");
        }
        Ok(())
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load an explicit file when given, otherwise walk the hierarchy
    pub fn load(config_override: Option<&Path>) -> Result<TaskboardConfig> {
        if let Some(path) = config_override {
            info!("Loading configuration override from: {:?}", path);
            return TaskboardConfig::from_toml_file(path);
        }
        Self::discover_config()
    }

    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<TaskboardConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return TaskboardConfig::from_toml_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(TaskboardConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        for candidate in Self::get_config_candidates() {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Configuration file candidates in priority order
    pub fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(env::local_config_file_path(&current_dir));
            candidates.push(env::local_dir_config_file_path(&current_dir));
        }

        if let Some(home_dir) = Self::get_home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        #[cfg(unix)]
        candidates.push(PathBuf::from(env::SYSTEM_CONFIG_PATH));

        candidates
    }

    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Render the hierarchy and which file (if any) is active
    pub fn discovery_report() -> String {
        let mut report = String::from("Configuration Discovery Hierarchy:\n\n");

        for (i, candidate) in Self::get_config_candidates().iter().enumerate() {
            let status = if candidate.is_file() {
                "EXISTS"
            } else if candidate.exists() {
                "NOT A FILE"
            } else {
                "NOT FOUND"
            };
            report.push_str(&format!("  {}. {:?} - {}\n", i + 1, candidate, status));
        }

        report.push('\n');
        match Self::find_config_file() {
            Some(found) => report.push_str(&format!("Active configuration: {:?}\n", found)),
            None => report.push_str("Active configuration: Built-in defaults\n"),
        }
        report
    }
}

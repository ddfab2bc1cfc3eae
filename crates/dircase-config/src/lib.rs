//! # dircase-config
//!
//! Configuration management for dircase.
//!
//! Loads configuration from:
//! 1. `~/.dircase/config.toml` (global)
//! 2. `.dircase/config.toml` (project-local, overrides global)
//! 3. Environment variables (highest priority)

pub mod logging;
pub mod testing;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Name of the application-scoped folder under the system temp directory
/// used to probe for case sensitivity support.
pub const SCRATCH_DIR_NAME: &str = "dircase";

/// Environment variable overriding `[probe] scratch_dir`
pub const ENV_SCRATCH_DIR: &str = "DIRCASE_SCRATCH_DIR";

/// Environment variable overriding `[log] level`
pub const ENV_LOG: &str = "DIRCASE_LOG";

/// Global config instance
static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::load().unwrap_or_default()));

/// Get global config (read-only)
pub fn config() -> std::sync::RwLockReadGuard<'static, Config> {
    CONFIG.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub probe: ProbeConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load config from standard locations
    pub fn load() -> Result<Self, ConfigError> {
        let global = Self::global_config_path();
        let mut config = Self::load_from(global.as_deref(), Path::new(".dircase/config.toml"))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit global path and project path, without
    /// consulting the environment. Missing files are skipped.
    pub fn load_from(global_path: Option<&Path>, project_path: &Path) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("Loading global config from {:?}", global_path);
                let contents = std::fs::read_to_string(global_path)?;
                config = toml::from_str(&contents)?;
            }
        }

        if project_path.exists() {
            debug!("Loading project config from {:?}", project_path);
            let contents = std::fs::read_to_string(project_path)?;
            let project_config: PartialConfig = toml::from_str(&contents)?;
            config.merge(project_config);
        }

        Ok(config)
    }

    /// Global config path: ~/.dircase/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".dircase/config.toml"))
    }

    /// Merge a project config; only keys present in the project file win.
    fn merge(&mut self, other: PartialConfig) {
        if let Some(probe) = other.probe {
            if let Some(scratch_dir) = probe.scratch_dir {
                self.probe.scratch_dir = scratch_dir;
            }
        }
        if let Some(log) = other.log {
            if let Some(level) = log.level {
                self.log.level = level;
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_SCRATCH_DIR).ok(),
            std::env::var(ENV_LOG).ok(),
        );
    }

    /// Apply override values as if they came from the environment.
    pub fn apply_overrides(&mut self, scratch_dir: Option<String>, log_level: Option<String>) {
        if let Some(path) = scratch_dir.filter(|p| !p.is_empty()) {
            self.probe.scratch_dir = PathBuf::from(path);
        }
        if let Some(level) = log_level.filter(|l| !l.is_empty()) {
            self.log.level = level;
        }
    }

    /// Render this config as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate default config TOML string
    pub fn default_toml() -> String {
        Config::default().to_toml().unwrap_or_default()
    }
}

/// Support probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Private directory opened to detect whether the OS supports
    /// per-directory case sensitivity. Created on demand.
    pub scratch_dir: PathBuf,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join(SCRATCH_DIR_NAME),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// error, warn, info, debug or trace
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Project-local overlay: every key optional so absent keys keep the
/// global value.
#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    probe: Option<PartialProbe>,
    log: Option<PartialLog>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialProbe {
    scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialLog {
    level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.probe.scratch_dir.ends_with(SCRATCH_DIR_NAME));
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[probe]"));
        assert!(toml_str.contains("[log]"));
        assert!(toml_str.contains("scratch_dir"));
    }

    #[test]
    fn test_overrides_ignore_empty_values() {
        let mut config = Config::default();
        let before = config.probe.scratch_dir.clone();
        config.apply_overrides(Some(String::new()), Some(String::new()));
        assert_eq!(config.probe.scratch_dir, before);
        assert_eq!(config.log.level, "warn");

        config.apply_overrides(Some("/tmp/probe-here".into()), Some("debug".into()));
        assert_eq!(config.probe.scratch_dir, PathBuf::from("/tmp/probe-here"));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_partial_project_config_keeps_other_keys() {
        let mut config = Config::default();
        config.log.level = "info".into();
        let partial: PartialConfig = toml::from_str("[probe]\nscratch_dir = \"/x/y\"\n").unwrap();
        config.merge(partial);
        assert_eq!(config.probe.scratch_dir, PathBuf::from("/x/y"));
        assert_eq!(config.log.level, "info");
    }
}

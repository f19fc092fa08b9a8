//! Configuration module
//!
//! Handles loading and managing configuration. Values come from the config
//! file, then environment variables, then command line flags.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::ConfigFile;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::output::OutputFormat;
use crate::tree::ViewKind;
use crate::utils::LogLevel;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Redraw interval of the explorer in milliseconds
    pub tick_ms: u64,

    /// Maximum cases executing at once; unbounded when unset
    pub max_concurrent: Option<usize>,

    /// View shown when the explorer starts
    pub start_view: ViewKind,

    /// Start with every node expanded
    pub expand_all: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log file of the interactive explorer; logging is off when unset
    pub log_file: Option<String>,

    /// Report format of headless runs
    pub default_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            max_concurrent: None,
            start_view: ViewKind::Code,
            expand_all: false,
            log_level: "info".to_string(),
            log_file: None,
            default_format: "table".to_string(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            anyhow::bail!("tick_ms must be greater than zero");
        }
        if self.max_concurrent == Some(0) {
            anyhow::bail!("max_concurrent must be greater than zero when set");
        }
        if LogLevel::from_str(&self.log_level).is_none() {
            anyhow::bail!("Invalid log level: {}", self.log_level);
        }
        if OutputFormat::from_str(&self.default_format).is_none() {
            anyhow::bail!("Invalid output format: {}", self.default_format);
        }
        Ok(())
    }

    /// Override values set through environment variables
    pub fn apply_env(&mut self, env: &EnvConfig) -> Result<()> {
        if let Some(tick_ms) = env.tick_ms {
            self.tick_ms = tick_ms;
        }
        if let Some(max) = env.max_concurrent {
            self.max_concurrent = Some(max);
        }
        if let Some(view) = &env.view {
            self.start_view = ViewKind::from_str(view)
                .with_context(|| format!("Invalid view in environment: {view}"))?;
        }
        if let Some(level) = &env.log_level {
            self.log_level = level.clone();
        }
        if let Some(file) = &env.log_file {
            self.log_file = Some(file.clone());
        }
        if let Some(format) = &env.format {
            self.default_format = format.clone();
        }
        self.validate()
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_str(&self.log_level).unwrap_or(LogLevel::Info)
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_str(&self.default_format).unwrap_or(OutputFormat::Table)
    }
}

/// Effective configuration and the file it came from
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub app: AppConfig,
    pub source: Option<PathBuf>,
}

/// Resolve the configuration.
///
/// An explicit path wins over `CASEVIEW_CONFIG`, which wins over the standard
/// locations. Environment overrides are applied last.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let env = EnvConfig::load();

    let source = match (explicit, &env.config_file) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(path)) => Some(PathBuf::from(path)),
        (None, None) => ConfigFile::find(),
    };

    let mut app = match &source {
        Some(path) => ConfigFile::load(path)?.app,
        None => AppConfig::default(),
    };
    app.apply_env(&env)?;

    Ok(LoadedConfig { app, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.tick_ms, 100);
        assert_eq!(config.max_concurrent, None);
        assert_eq!(config.start_view, ViewKind::Code);
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AppConfig {
            tick_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            default_format: "xml".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            max_concurrent: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_env() {
        let mut config = AppConfig::default();
        let env = EnvConfig {
            tick_ms: Some(250),
            max_concurrent: Some(8),
            view: Some("category".to_string()),
            format: Some("json".to_string()),
            ..Default::default()
        };
        config.apply_env(&env).unwrap();

        assert_eq!(config.tick_ms, 250);
        assert_eq!(config.max_concurrent, Some(8));
        assert_eq!(config.start_view, ViewKind::Category);
        assert_eq!(config.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_apply_env_rejects_unknown_view() {
        let mut config = AppConfig::default();
        let env = EnvConfig {
            view: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(config.apply_env(&env).is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("tick_ms: 50\nstart_view: category\n").unwrap();
        assert_eq!(config.tick_ms, 50);
        assert_eq!(config.start_view, ViewKind::Category);
        assert_eq!(config.default_format, "table");
    }
}

//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! An explicit path (`--config`) is used as-is and must exist. Otherwise
//! the first existing file wins:
//! 1. `$GITSIM_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitsim/config.toml`
//! 3. `~/.gitsim/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use gitsim::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("id length: {}", config.id_length());
//! println!("json output: {}", config.json_output());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, OutputDefaults, RepositoryDefaults};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::ids::DEFAULT_ID_LENGTH;
use crate::core::repository::RepositorySettings;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GITSIM_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed configuration file contents
    pub global: GlobalConfig,
    /// Path the configuration was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// If `explicit` is given it must exist. Otherwise the standard
    /// locations are searched and a missing file means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read,
    /// parsed, or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match explicit {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
            None => Self::discover(),
        };

        let global = match &path {
            Some(path) => Self::read_config(path)?,
            None => GlobalConfig::default(),
        };
        global.validate()?;

        Ok(Config { global, path })
    }

    /// Build a configuration from already-parsed values.
    pub fn from_global(global: GlobalConfig) -> Result<Config, ConfigError> {
        global.validate()?;
        Ok(Config { global, path: None })
    }

    /// Find the first existing config file in the standard locations.
    fn discover() -> Option<PathBuf> {
        // 1. Check $GITSIM_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/gitsim/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gitsim/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.gitsim/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".gitsim/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Path the configuration was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Commit id length.
    ///
    /// Defaults to 8 if not configured.
    pub fn id_length(&self) -> usize {
        self.global
            .repository
            .as_ref()
            .and_then(|r| r.id_length)
            .unwrap_or(DEFAULT_ID_LENGTH)
    }

    /// Root commit message.
    ///
    /// Defaults to the empty string if not configured.
    pub fn root_message(&self) -> &str {
        self.global
            .repository
            .as_ref()
            .and_then(|r| r.root_message.as_deref())
            .unwrap_or("")
    }

    /// Whether output should be JSON by default.
    pub fn json_output(&self) -> bool {
        self.global
            .output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f == "json")
    }

    /// Tracing filter used when `RUST_LOG` is unset.
    ///
    /// Defaults to `"warn"` if not configured.
    pub fn log_filter(&self) -> &str {
        self.global.log_filter.as_deref().unwrap_or("warn")
    }

    /// Settings for newly created repositories.
    pub fn repository_settings(&self) -> RepositorySettings {
        RepositorySettings {
            id_length: self.id_length(),
            root_message: self.root_message().to_string(),
        }
    }

    /// Render the effective configuration as TOML, defaults filled in.
    pub fn to_effective_toml(&self) -> Result<String, ConfigError> {
        let effective = GlobalConfig {
            log_filter: Some(self.log_filter().to_string()),
            repository: Some(RepositoryDefaults {
                id_length: Some(self.id_length()),
                root_message: Some(self.root_message().to_string()),
            }),
            output: Some(OutputDefaults {
                format: Some(if self.json_output() { "json" } else { "text" }.to_string()),
            }),
        };
        toml::to_string_pretty(&effective).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.id_length(), 8);
        assert_eq!(config.root_message(), "");
        assert!(!config.json_output());
        assert_eq!(config.log_filter(), "warn");
        assert!(config.path().is_none());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let file = write_config("[repository]\nid_length = 16\n[output]\nformat = \"json\"\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.id_length(), 16);
        assert!(config.json_output());
        assert_eq!(config.path(), Some(file.path()));
        assert_eq!(config.repository_settings().id_length, 16);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn parse_error_names_the_file() {
        let file = write_config("this is = = not toml");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn invalid_values_rejected_on_load() {
        let file = write_config("[repository]\nid_length = 100\n");
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn effective_toml_round_trips() {
        let config = Config::default();
        let rendered = config.to_effective_toml().unwrap();
        let parsed: GlobalConfig = toml::from_str(&rendered).unwrap();
        let reloaded = Config::from_global(parsed).unwrap();
        assert_eq!(reloaded.id_length(), config.id_length());
        assert_eq!(reloaded.log_filter(), config.log_filter());
    }
}

//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! Searched in order:
//! 1. `$GITSIM_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitsim/config.toml`
//! 3. `~/.gitsim/config.toml`
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g. the id length must be
//! within the range commit ids accept).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::CommitId;

/// Top-level configuration.
///
/// # Example
///
/// ```toml
/// log_filter = "gitsim=debug"
///
/// [repository]
/// id_length = 10
/// root_message = "Initial commit"
///
/// [output]
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default tracing filter directive when `RUST_LOG` is unset
    pub log_filter: Option<String>,

    /// Defaults for newly created repositories
    pub repository: Option<RepositoryDefaults>,

    /// Output defaults
    pub output: Option<OutputDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "log_filter cannot be empty".to_string(),
                ));
            }
        }

        if let Some(repository) = &self.repository {
            repository.validate()?;
        }

        if let Some(output) = &self.output {
            output.validate()?;
        }

        Ok(())
    }
}

/// Repository creation defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryDefaults {
    /// Commit id length in hex characters
    pub id_length: Option<usize>,

    /// Message of the root commit
    pub root_message: Option<String>,
}

impl RepositoryDefaults {
    /// Validate the repository defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(len) = self.id_length {
            if !(CommitId::MIN_LEN..=CommitId::MAX_LEN).contains(&len) {
                return Err(ConfigError::InvalidValue(format!(
                    "id_length must be between {} and {}, got {}",
                    CommitId::MIN_LEN,
                    CommitId::MAX_LEN,
                    len
                )));
            }
        }
        Ok(())
    }
}

/// Output defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputDefaults {
    /// Output format ("text" or "json")
    pub format: Option<String>,
}

impl OutputDefaults {
    /// Valid output formats.
    pub const VALID_FORMATS: &'static [&'static str] = &["text", "json"];

    /// Validate the output configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.format {
            if !Self::VALID_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid output format '{}', must be one of: {}",
                    format,
                    Self::VALID_FORMATS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_valid() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn full_config_parses() {
        let config: GlobalConfig = toml::from_str(
            r#"
            log_filter = "debug"

            [repository]
            id_length = 12
            root_message = "Initial commit"

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        let repository = config.repository.unwrap();
        assert_eq!(repository.id_length, Some(12));
        assert_eq!(repository.root_message.as_deref(), Some("Initial commit"));
        assert_eq!(config.output.unwrap().format.as_deref(), Some("json"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<GlobalConfig, _> = toml::from_str("colour = true");
        assert!(result.is_err());

        let result: Result<GlobalConfig, _> = toml::from_str("[repository]\nsize = 3");
        assert!(result.is_err());
    }

    #[test]
    fn id_length_out_of_range() {
        let config = GlobalConfig {
            repository: Some(RepositoryDefaults {
                id_length: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn invalid_output_format() {
        let output = OutputDefaults {
            format: Some("yaml".into()),
        };
        assert!(output.validate().is_err());
    }

    #[test]
    fn blank_log_filter_rejected() {
        let config = GlobalConfig {
            log_filter: Some("  ".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Runtime configuration for hosts embedding the canvas core.
//!
//! Every field is optional in the JSON document; missing fields take their
//! defaults (in-memory store, build-mode log level, no file logging).

use crate::graph::layout::{LayoutConfig, LayoutConfigError};
use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const SUPPORTED_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// SQLite file backing the project store; `None` keeps projects in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    /// Directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub layout: LayoutConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Layout(LayoutConfigError),
    UnsupportedLogLevel(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "config_parse",
            Self::Layout(_) => "config_layout",
            Self::UnsupportedLogLevel(_) => "config_log_level",
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Layout(err) => write!(f, "invalid layout config: {err}"),
            Self::UnsupportedLogLevel(level) => write!(f, "unsupported log level `{level}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::UnsupportedLogLevel(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<LayoutConfigError> for ConfigError {
    fn from(value: LayoutConfigError) -> Self {
        Self::Layout(value)
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        if let Some(level) = &self.log_level {
            let normalized = level.trim().to_ascii_lowercase();
            if !SUPPORTED_LEVELS.contains(&normalized.as_str()) {
                return Err(ConfigError::UnsupportedLogLevel(level.clone()));
            }
        }
        Ok(())
    }

    /// Configured level, or the build-mode default.
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use crate::graph::layout::LayoutConfig;
    use crate::logging::default_log_level;
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.layout, LayoutConfig::default());
        assert!(config.db_path.is_none());
        assert_eq!(config.effective_log_level(), default_log_level());
    }

    #[test]
    fn partial_layout_keeps_remaining_defaults() {
        let config = CoreConfig::from_json_str(
            r#"{ "db_path": "/tmp/board.db", "log_level": "warn", "layout": { "columns": 4 } }"#,
        )
        .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/board.db")));
        assert_eq!(config.effective_log_level(), "warn");
        assert_eq!(config.layout.columns, 4);
        assert_eq!(config.layout.spacing, 120.0);
    }

    #[test]
    fn invalid_documents_are_rejected_with_codes() {
        let zero = CoreConfig::from_json_str(r#"{ "layout": { "columns": 0 } }"#).unwrap_err();
        assert_eq!(zero.code(), "config_layout");

        let level = CoreConfig::from_json_str(r#"{ "log_level": "loud" }"#).unwrap_err();
        assert!(matches!(level, ConfigError::UnsupportedLogLevel(_)));

        let unknown = CoreConfig::from_json_str(r#"{ "dbPath": "x" }"#).unwrap_err();
        assert_eq!(unknown.code(), "config_parse");
    }
}

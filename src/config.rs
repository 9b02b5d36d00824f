//! Application configuration, loadable from TOML.
//!
//! Every section falls back to its defaults, so an empty file is valid:
//!
//! ```toml
//! log_filter = "rust_gomoku=debug"
//!
//! [server]
//! port = 9000
//! coord_scheme = "legacy-hex"
//!
//! [search]
//! max_depth = 3
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::BOARD_SIZE;
use crate::notation::CoordScheme;
use crate::search::SearchConfig;

/// Deepest search `validate` accepts.
pub const MAX_SEARCH_DEPTH: u32 = 8;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Network and room settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Rooms created at startup, numbered from 1.
    pub rooms: u32,
    /// Master seed for rematch colours; random when absent.
    pub seed: Option<u64>,
    pub coord_scheme: CoordScheme,
    /// ANSI colours in rendered boards.
    pub color: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            rooms: 10,
            seed: None,
            coord_scheme: CoordScheme::Canonical,
            color: true,
        }
    }
}

impl ServerConfig {
    /// `host:port`.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.rooms == 0 {
            return Err(ConfigError::Validation("server.rooms must be > 0".into()));
        }
        if self.search.max_depth == 0 {
            return Err(ConfigError::Validation("search.max_depth must be > 0".into()));
        }
        if self.search.max_depth > MAX_SEARCH_DEPTH {
            return Err(ConfigError::Validation(format!(
                "search.max_depth must be <= {MAX_SEARCH_DEPTH}"
            )));
        }
        if self.search.radius as usize > BOARD_SIZE {
            return Err(ConfigError::Validation(format!("search.radius must be <= {BOARD_SIZE}")));
        }
        if self.search.branch_widths.is_empty() {
            return Err(ConfigError::Validation(
                "search.branch_widths must not be empty".into(),
            ));
        }
        if self.search.branch_widths.contains(&0) {
            return Err(ConfigError::Validation(
                "search.branch_widths entries must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8888");
        assert_eq!(config.search.max_depth, 4);
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000
            coord_scheme = "legacy-hex"

            [search]
            branch_widths = [10, 5]
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.rooms, 10);
        assert_eq!(config.server.coord_scheme, CoordScheme::LegacyHex);
        assert_eq!(config.search.max_depth, 4);
        assert_eq!(config.search.branch_widths, vec![10, 5]);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = AppConfig::default();
        config.server.rooms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = AppConfig::default();
        config.search.branch_widths = vec![8, 0];
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "config validation error: search.branch_widths entries must be > 0"
        );
    }

    #[test]
    fn test_search_bounds() {
        let mut config = AppConfig::default();
        config.search.max_depth = MAX_SEARCH_DEPTH;
        config.search.radius = BOARD_SIZE as u32;
        assert!(config.validate().is_ok());

        config.search.max_depth = 40;
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "config validation error: search.max_depth must be <= 8");

        config.search.max_depth = 4;
        config.search.radius = 1000;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }
}

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::backup::ConflictResolution;

pub const DEFAULT_CONFIG_PATH: &str = ".quire/config.toml";
const DEFAULT_APP_NAME: &str = "quire";
const DEFAULT_BACKUP_DIR: &str = "backups";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML in '{path}': {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub app_name: String,
    pub backup_dir: PathBuf,
    pub conflict_resolution: ConflictResolution,
    pub restore_settings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            conflict_resolution: ConflictResolution::Skip,
            restore_settings: false,
        }
    }
}

impl Config {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::from_toml(&raw).map_err(|err| match err {
            ConfigError::Toml { source, .. } => ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub(crate) fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw).map_err(|source| ConfigError::Toml {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let name = self.app_name.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "app_name must not be empty".to_string(),
            ));
        }
        if name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue(format!(
                "app_name '{}' must not contain path separators",
                self.app_name
            )));
        }
        Ok(())
    }
}

//! Configuration management for kvfs
//!
//! Values come from built-in defaults, an optional `kvfs.toml` in the working
//! directory, and `KVFS_*` environment variables, in increasing priority.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::entry::FileMode;

const DEFAULT_CONFIG_NAME: &str = "kvfs";

/// Volume and tool configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct VolumeConfig {
    /// Database file backing the volume
    /// Environment: KVFS_DB_PATH
    pub db_path: String,

    /// Directory context a freshly opened volume resolves relative names
    /// against. Empty means relative names stay relative keys. An existing
    /// entry here must be a directory; a missing one is used as given.
    /// Environment: KVFS_INITIAL_DIR
    pub initial_dir: String,

    /// Commit after every write while ingesting archives
    /// Environment: KVFS_SYNC_ON_WRITE
    pub sync_on_write: bool,

    /// Permission bits for files created without an explicit mode
    /// Environment: KVFS_DEFAULT_MODE (decimal)
    pub default_mode: u32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            db_path: "kvfs.db".to_string(),
            initial_dir: String::new(),
            sync_on_write: false,
            default_mode: 0o644,
        }
    }
}

impl VolumeConfig {
    /// Load configuration from `kvfs.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_NAME)
    }

    /// Load configuration from the file `name` (extension optional, may be
    /// missing) with environment overrides
    pub fn load_from(name: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("db_path", defaults.db_path)?
            .set_default("initial_dir", defaults.initial_dir)?
            .set_default("sync_on_write", defaults.sync_on_write)?
            .set_default("default_mode", i64::from(defaults.default_mode))?
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("KVFS"))
            .build()?;

        let config: VolumeConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.trim().is_empty() {
            return Err(ConfigError::Message("db_path cannot be empty".into()));
        }

        if self.default_mode & !FileMode::PERM_MASK != 0 {
            return Err(ConfigError::Message(format!(
                "default_mode {:o} has bits outside {:o}",
                self.default_mode,
                FileMode::PERM_MASK
            )));
        }

        Ok(())
    }

    /// Get database path as PathBuf
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.db_path)
    }

    /// Default mode for new regular files
    pub fn default_file_mode(&self) -> FileMode {
        FileMode::regular(self.default_mode)
    }
}

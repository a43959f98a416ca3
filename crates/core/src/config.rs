//! Startup configuration: the master key, the bootstrap admin account, where
//! the store lives, and the log level. Read from an optional TOML file; every
//! field has a default.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumConfig {
    /// Shared secret gating password resets and admin operations.
    #[serde(default = "default_master_key")]
    pub master_key: String,

    /// Account created on first start if no user of that name exists.
    #[serde(default)]
    pub default_admin: AdminCredentials,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminCredentials {
    #[serde(default = "default_admin_username")]
    pub username: String,
    #[serde(default = "default_admin_password")]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite store. Empty means `~/.familyalbum/album.db`.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_master_key() -> String {
    "family-master-key".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin1234".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            master_key: default_master_key(),
            default_admin: AdminCredentials::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: default_admin_password(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AlbumConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// The configured store path, or the per-user default.
    pub fn store_path(&self) -> PathBuf {
        if self.storage.path.is_empty() {
            default_dir().join("album.db")
        } else {
            PathBuf::from(&self.storage.path)
        }
    }
}

/// `~/.familyalbum`, falling back to `./.familyalbum` without `$HOME`.
pub fn default_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".familyalbum")
}

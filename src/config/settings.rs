//! Application settings loaded from `config.toml`.
//!
//! Every section is optional and falls back to defaults, so a missing file is
//! not an error. Environment variables (usually from `.env`) override the
//! database URL and the app data directory.

use crate::config::database::{DEFAULT_DATABASE_URL, resolve_database_url};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How writes to a doctor's embedded slot list handle concurrent writers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotWritePolicy {
    /// Write only if the slot list is unchanged since it was read
    #[default]
    CompareAndSwap,
    /// Overwrite unconditionally; concurrent bookings can double-book a slot
    LastWriterWins,
}

/// `[database]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// `SeaORM` connection URL
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Root of the app-private directory where images are copied
    pub app_data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            app_data_dir: PathBuf::from("data"),
        }
    }
}

/// `[booking]` section
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct BookingSettings {
    /// Conflict handling for slot list writes
    pub slot_write_policy: SlotWritePolicy,
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database connection settings
    pub database: DatabaseSettings,
    /// Local file storage settings
    pub storage: StorageSettings,
    /// Appointment booking settings
    pub booking: BookingSettings,
}

impl AppConfig {
    /// Applies `DATABASE_URL` and `APP_DATA_DIR` from the environment.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.database.url = resolve_database_url(&self.database.url);
        if let Ok(dir) = std::env::var("APP_DATA_DIR") {
            self.storage.app_data_dir = PathBuf::from(dir);
        }
        self
    }
}

/// Parses settings from a TOML string.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a value has the wrong type.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from a TOML file. A missing file yields the defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("No settings file at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_config(&contents)
}

/// Loads settings from `./config.toml` and applies environment overrides.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml").map(AppConfig::with_env_overrides)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [database]
            url = "sqlite::memory:"

            [storage]
            app_data_dir = "/tmp/bethel"

            [booking]
            slot_write_policy = "last_writer_wins"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.storage.app_data_dir, PathBuf::from("/tmp/bethel"));
        assert_eq!(
            config.booking.slot_write_policy,
            SlotWritePolicy::LastWriterWins
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.storage.app_data_dir, PathBuf::from("data"));
        assert_eq!(
            config.booking.slot_write_policy,
            SlotWritePolicy::CompareAndSwap
        );
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = parse_config("[booking]\nslot_write_policy = \"lock\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config("definitely/not/here/config.toml").unwrap();
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
    }
}

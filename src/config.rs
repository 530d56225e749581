//! # Configuration
//!
//! ticktrack configuration is managed by [`confique`], layering environment
//! variables over an optional TOML file over compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `TICKTRACK_REMINDER_INTERVAL_SECS`, `TICKTRACK_DATA_DIR`, etc.
//! 2. **Config file**: `ticktrack.toml` in the OS config directory, or an explicit path.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `reminder_interval_secs` | `60` | Period of the reminder scanner |
//! | `reminder_window_secs` | `300` | Due-soon / overdue window around a due time |
//! | `default_sort` | `priority` | Sort key used when a listing does not name one |
//! | `data_dir` | OS data directory | Root of the filesystem storage |

use crate::error::{Result, TickError};
use crate::ordering::SortKey;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const CONFIG_FILE: &str = "ticktrack.toml";

/// Configuration for ticktrack, stored in `ticktrack.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TickConfig {
    /// Seconds between two reminder scans.
    #[config(default = 60, env = "TICKTRACK_REMINDER_INTERVAL_SECS")]
    pub reminder_interval_secs: u64,

    /// Width, in seconds, of the window on each side of a due time.
    #[config(default = 300, env = "TICKTRACK_REMINDER_WINDOW_SECS")]
    pub reminder_window_secs: u64,

    /// Sort key for listings: priority, dueDate, title, category or completed.
    #[config(default = "priority", env = "TICKTRACK_DEFAULT_SORT")]
    pub default_sort: String,

    /// Where the filesystem backend keeps its data.
    /// When absent, the OS data directory for ticktrack is used.
    #[config(env = "TICKTRACK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            reminder_interval_secs: 60,
            reminder_window_secs: 300,
            default_sort: "priority".to_string(),
            data_dir: None,
        }
    }
}

impl TickConfig {
    /// Load from the environment and `path` (skipped when the file is missing).
    pub fn load_from(path: &Path) -> Result<Self> {
        TickConfig::builder()
            .env()
            .file(path)
            .load()
            .map_err(|e| TickError::Config(e.to_string()))
    }

    /// Load from the environment and the default config file location.
    pub fn load() -> Result<Self> {
        match project_dirs() {
            Some(dirs) => Self::load_from(&dirs.config_dir().join(CONFIG_FILE)),
            None => TickConfig::builder()
                .env()
                .load()
                .map_err(|e| TickError::Config(e.to_string())),
        }
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs.max(1))
    }

    pub fn reminder_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.reminder_window_secs.min(i64::MAX as u64) as i64)
    }

    /// The configured sort key, falling back to `priority` when unrecognized.
    pub fn default_sort(&self) -> SortKey {
        self.default_sort.parse().unwrap_or_else(|_| {
            warn!(value = %self.default_sort, "unknown default_sort, using priority");
            SortKey::default()
        })
    }

    /// The storage root: the configured `data_dir`, or the OS data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| TickError::Config("no home directory to store data in".to_string()))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "ticktrack")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TickConfig::default();
        assert_eq!(config.reminder_interval(), Duration::from_secs(60));
        assert_eq!(config.reminder_window(), chrono::Duration::minutes(5));
        assert_eq!(config.default_sort(), SortKey::Priority);
    }

    #[test]
    fn test_unknown_sort_falls_back() {
        let config = TickConfig {
            default_sort: "size".to_string(),
            ..Default::default()
        };
        assert_eq!(config.default_sort(), SortKey::Priority);
    }

    #[test]
    fn test_zero_interval_clamped() {
        let config = TickConfig {
            reminder_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.reminder_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_explicit_data_dir() {
        let config = TickConfig {
            data_dir: Some(PathBuf::from("/tmp/ticktrack-data")),
            ..Default::default()
        };
        assert_eq!(
            config.data_dir().unwrap(),
            PathBuf::from("/tmp/ticktrack-data")
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let written = TickConfig {
            reminder_interval_secs: 15,
            reminder_window_secs: 120,
            default_sort: "dueDate".to_string(),
            data_dir: Some(dir.path().join("data")),
        };
        std::fs::write(&path, toml::to_string(&written).unwrap()).unwrap();

        let loaded = TickConfig::load_from(&path).unwrap();
        assert_eq!(loaded.reminder_interval_secs, 15);
        assert_eq!(loaded.default_sort(), SortKey::DueDate);
        assert_eq!(loaded.data_dir, Some(dir.path().join("data")));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = TickConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.reminder_window_secs, 300);
    }
}

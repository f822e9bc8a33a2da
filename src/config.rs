//! Settings
//!
//! Loaded from a RON file. Anything missing falls back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::items::REFUND_WINDOW_SECS;
use crate::save::default_store_path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RON game data; built-in content when unset
    pub data_file: Option<PathBuf>,
    pub store_path: PathBuf,
    pub log_filter: String,
    pub refund_window_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            store_path: default_store_path(),
            log_filter: "info".to_string(),
            refund_window_secs: REFUND_WINDOW_SECS,
        }
    }
}

/// Default settings file location
pub fn settings_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "itemforge", "Itemforge") {
        let mut path = proj_dirs.config_dir().to_path_buf();
        path.push("settings.ron");
        path
    } else {
        PathBuf::from("./settings.ron")
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    /// Load `path`, or defaults if it is missing or unreadable
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Settings loaded from {:?}", path);
                settings
            }
            Err(e) => {
                log::warn!("{} in {:?}, using defaults", e, path);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("itemforge-settings-{}-{}", std::process::id(), name));
        path
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("partial.ron");
        fs::write(&path, "(log_filter: \"debug\", refund_window_secs: 60)").unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.log_filter, "debug");
        assert_eq!(settings.refund_window_secs, 60);
        assert_eq!(settings.data_file, None);
        assert_eq!(settings.store_path, default_store_path());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_bad_file_falls_back() {
        let path = temp_path("broken.ron");
        fs::write(&path, "(log_filter: ").unwrap();

        assert!(matches!(Settings::from_file(&path), Err(ConfigError::Parse(_))));
        assert_eq!(Settings::load(&path), Settings::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let settings = Settings::load(Path::new("/nonexistent/itemforge/settings.ron"));
        assert_eq!(settings.refund_window_secs, REFUND_WINDOW_SECS);
    }
}

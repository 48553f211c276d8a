use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

const APP_DIR: &str = "pineapple-updater";
const PREFERENCES_FILE: &str = "preferences.json";

/// Settings the user can change from the settings panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub install_path: PathBuf,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            install_path: default_install_path(),
        }
    }
}

pub fn default_install_path() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("C:/yuzu")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("yuzu")
    }
}

/// Directory for the log file.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// JSON file holding [`Preferences`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(config_dir.join(APP_DIR).join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file yields the defaults.
    pub fn load(&self) -> Result<Preferences, AppError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!(
                    "No preferences at {}, using defaults",
                    self.path.display()
                );
                return Ok(Preferences::default());
            }
            Err(err) => {
                log::error!(
                    "Error occurred during preferences reading\nPath: {}\nError: {}",
                    self.path.display(),
                    err
                );
                return Err(AppError::Config(err.to_string()));
            }
        };

        serde_json::from_str(&content).map_err(|err| {
            log::error!(
                "Error occurred during preferences parsing\nPath: {}\nError: {}",
                self.path.display(),
                err
            );
            AppError::Config(err.to_string())
        })
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(preferences)
            .map_err(|err| AppError::Config(err.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                log::error!(
                    "Error occurred during dirs creating\nPath: {}\nError: {}",
                    parent.display(),
                    err
                );
                AppError::Config(err.to_string())
            })?;
        }

        std::fs::write(&self.path, content).map_err(|err| {
            log::error!(
                "Error occurred during preferences writing\nPath: {}\nError: {}",
                self.path.display(),
                err
            );
            AppError::Config(err.to_string())
        })?;

        log::info!("Preferences {} updated", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("preferences.json"));

        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("nested").join("preferences.json"));
        let preferences = Preferences {
            install_path: PathBuf::from("/games/yuzu"),
        };

        store.save(&preferences).unwrap();

        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), preferences);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = PreferenceStore::new(path).load();

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_unknown_fields_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let preferences = PreferenceStore::new(path).load().unwrap();

        assert_eq!(preferences.install_path, default_install_path());
    }
}

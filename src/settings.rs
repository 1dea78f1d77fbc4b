use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assistant::{AssistantConfig, DEFAULT_MONTHLY_BUDGET};
use crate::error::{PennyError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    #[serde(default = "default_monthly_budget")]
    pub monthly_budget: f64,
    #[serde(default = "default_classifier_timeout_ms")]
    pub classifier_timeout_ms: u64,
}

fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}

fn default_monthly_budget() -> f64 {
    DEFAULT_MONTHLY_BUDGET
}

fn default_classifier_timeout_ms() -> u64 {
    1500
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir_string(),
            monthly_budget: default_monthly_budget(),
            classifier_timeout_ms: default_classifier_timeout_ms(),
        }
    }
}

impl Settings {
    pub fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig {
            budget: self.monthly_budget,
            classifier_timeout: Duration::from_millis(self.classifier_timeout_ms),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("penny")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("penny")
}

/// Settings from disk, or defaults when the file is missing or unreadable.
pub fn load_settings() -> Settings {
    load_from(&settings_path())
}

fn load_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_to(&config_dir(), settings)
}

fn save_to(dir: &Path, settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| PennyError::Settings(e.to_string()))?;
    std::fs::write(dir.join("settings.json"), format!("{json}\n"))?;
    Ok(())
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(shellexpand_path(&load_settings().data_dir))
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            data_dir: "/tmp/penny-test".to_string(),
            monthly_budget: 450_000.0,
            classifier_timeout_ms: 300,
        };
        save_to(dir.path(), &settings).unwrap();
        let loaded = load_from(&dir.path().join("settings.json"));
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_from(&dir.path().join("nope.json"));
        assert_eq!(s, Settings::default());
        assert_eq!(s.monthly_budget, 1_000_000.0);
        assert_eq!(s.classifier_timeout_ms, 1500);
        assert!(s.data_dir.ends_with("penny"));
    }

    #[test]
    fn test_garbage_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test", "monthly_budget": 300000}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.data_dir, "/tmp/test");
        assert_eq!(s.monthly_budget, 300_000.0);
        assert_eq!(s.classifier_timeout_ms, 1500);
    }

    #[test]
    fn test_assistant_config_from_settings() {
        let s = Settings {
            monthly_budget: 200_000.0,
            classifier_timeout_ms: 250,
            ..Default::default()
        };
        let config = s.assistant_config();
        assert_eq!(config.budget, 200_000.0);
        assert_eq!(config.classifier_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_shellexpand_tilde() {
        if let Some(home) = dirs::home_dir() {
            let expanded = shellexpand_path("~/books");
            assert_eq!(expanded, format!("{}/books", home.to_string_lossy()));
        }
        assert_eq!(shellexpand_path("/abs/path"), "/abs/path");
    }
}

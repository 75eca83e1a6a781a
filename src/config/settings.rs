use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use lazy_static::lazy_static;

use super::paths;
use crate::error::StudyError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    pub work_minutes: u32,
    pub break_minutes: u32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        FocusConfig {
            work_minutes: 25,
            break_minutes: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakReminderConfig {
    /// Minutes of study before the reminder fires
    pub interval_minutes: u32,
    /// Suggested break length shown in the reminder
    pub break_minutes: u32,
}

impl Default for BreakReminderConfig {
    fn default() -> Self {
        BreakReminderConfig {
            interval_minutes: 25,
            break_minutes: 5,
        }
    }
}

/// Profile seeded on first launch when no profile exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultProfileConfig {
    pub name: String,
    pub email: String,
    pub password: String,
    pub study_goal_hours: u32,
}

impl Default for DefaultProfileConfig {
    fn default() -> Self {
        DefaultProfileConfig {
            name: "Study Buddy".to_string(),
            email: "student@smartstudy.local".to_string(),
            password: "studysmart".to_string(),
            study_goal_hours: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the platform data directory when set
    pub data_dir: Option<PathBuf>,
    /// Number of topics returned by review suggestions
    pub suggestion_limit: usize,
    pub focus: FocusConfig,
    pub break_reminder: BreakReminderConfig,
    pub default_profile: DefaultProfileConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: None,
            suggestion_limit: 10,
            focus: FocusConfig::default(),
            break_reminder: BreakReminderConfig::default(),
            default_profile: DefaultProfileConfig::default(),
        }
    }
}

impl AppConfig {
    /// Data directory: environment override, then config file, then platform default
    pub fn resolved_data_dir(&self) -> PathBuf {
        if std::env::var_os(paths::DATA_DIR_ENV).is_some() {
            return paths::default_data_dir();
        }
        self.data_dir.clone().unwrap_or_else(paths::default_data_dir)
    }
}

/// Parse a config file. A missing file yields defaults; a malformed one is an error.
pub fn load_app_config_from(path: &Path) -> Result<AppConfig, StudyError> {
    match fs::read_to_string(path) {
        Ok(content) => toml::from_str::<AppConfig>(&content)
            .map_err(|e| StudyError::from(e).with_context(format!("path: {:?}", path))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(StudyError::from(e).with_context(format!("path: {:?}", path))),
    }
}

fn load_app_config_internal() -> AppConfig {
    let config_path = paths::config_path();
    match load_app_config_from(&config_path) {
        Ok(config) => {
            tracing::info!(path = ?config_path, "Loaded app config");
            config
        }
        Err(e) => {
            tracing::warn!(path = ?config_path, error = %e, "Failed to parse config, using defaults");
            AppConfig::default()
        }
    }
}

lazy_static! {
    static ref APP_CONFIG: AppConfig = load_app_config_internal();
}

/// Get the cached app configuration (loaded once at startup)
pub fn get_app_config() -> &'static AppConfig {
    &APP_CONFIG
}

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "HEALTH_EVAL_CONFIG";
pub const DATA_DIR_ENV: &str = "HEALTH_EVAL_DATA_DIR";
pub const LOG_DIR_ENV: &str = "HEALTH_EVAL_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AppSettings {
    /// Directory holding one JSON file per evaluation.
    pub data_dir: PathBuf,
    /// When set, logs are written as JSON lines to a daily rolling file here.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_dir: None,
        }
    }
}

impl AppSettings {
    /// File settings (explicit path, else `HEALTH_EVAL_CONFIG`), then env overrides.
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let mut settings = match config_path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_yaml_file(&path)?,
            None => Self::default(),
        };
        settings.apply_overrides(
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
        );
        Ok(settings)
    }

    pub fn from_yaml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|error| {
            AppError::Io(format!("failed to read settings {}: {}", path.display(), error))
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> AppResult<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).map_err(AppError::from)
    }

    pub fn apply_overrides(&mut self, data_dir: Option<PathBuf>, log_dir: Option<PathBuf>) {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        if let Some(log_dir) = log_dir {
            self.log_dir = Some(log_dir);
        }
    }
}

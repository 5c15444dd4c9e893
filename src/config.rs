//! Settings for the labeling console, stored as `config.toml` in the app root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiLimits;
use crate::app_dirs;
use crate::crops::CropResolver;
use crate::predictables::{FullModelType, ModelType, Orientation, PredictableError};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable that replaces `[api].host`.
pub const API_HOST_ENV: &str = "FASTAPI_HOST";

/// Errors that may occur while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
    /// `[session]` names a kind/orientation pair that cannot be labeled.
    #[error("Invalid start session: {0}")]
    InvalidSession(#[from] PredictableError),
}

/// Everything read from `config.toml`. Missing sections and keys fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub crops: CropSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_matches_limit")]
    pub matches_limit: usize,
    #[serde(default = "default_labels_limit")]
    pub labels_limit: usize,
    #[serde(default = "default_catalog_limit")]
    pub catalog_limit: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            matches_limit: default_matches_limit(),
            labels_limit: default_labels_limit(),
            catalog_limit: default_catalog_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSettings {
    /// Folder holding one subfolder of crops per kind; `<app root>/crops` when unset.
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default = "default_image_ext")]
    pub image_ext: String,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            root: None,
            image_ext: default_image_ext(),
        }
    }
}

/// Session shown first when the console starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_model_type")]
    pub model_type: ModelType,
    #[serde(default = "default_orientation")]
    pub orientation: Orientation,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model_type: default_model_type(),
            orientation: default_orientation(),
        }
    }
}

fn default_host() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_matches_limit() -> usize {
    ApiLimits::default().matches
}

fn default_labels_limit() -> usize {
    ApiLimits::default().labels
}

fn default_catalog_limit() -> usize {
    ApiLimits::default().catalog
}

fn default_image_ext() -> String {
    "jpg".to_string()
}

fn default_model_type() -> ModelType {
    ModelType::Perks
}

fn default_orientation() -> Orientation {
    Orientation::Survivor
}

impl AppConfig {
    pub fn api_limits(&self) -> ApiLimits {
        ApiLimits {
            matches: self.api.matches_limit,
            labels: self.api.labels_limit,
            catalog: self.api.catalog_limit,
        }
    }

    /// Kind/orientation pair the console opens on.
    pub fn start_fmt(&self) -> Result<FullModelType, ConfigError> {
        Ok(FullModelType::new(
            self.session.model_type,
            self.session.orientation,
        )?)
    }

    pub fn crop_resolver(&self) -> Result<CropResolver, ConfigError> {
        let root = match &self.crops.root {
            Some(root) => root.clone(),
            None => app_dirs::default_crops_dir().map_err(map_app_dir_error)?,
        };
        Ok(CropResolver::new(root, self.crops.image_ext.clone()))
    }

    /// Replace the API host when `host` is set and not blank.
    pub fn apply_host_override(&mut self, host: Option<String>) {
        if let Some(host) = host.filter(|host| !host.trim().is_empty()) {
            tracing::debug!(%host, "API host taken from environment");
            self.api.host = host;
        }
    }
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load `config.toml` from the app root, returning defaults if it does not exist.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    load_from(&config_path()?)
}

/// Load a configuration file, returning defaults if it does not exist. `FASTAPI_HOST` wins
/// over the file's host.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut config = read_config(path)?;
    config.apply_host_override(std::env::var(API_HOST_ENV).ok());
    Ok(config)
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Save configuration to a specific path, creating parent directories as needed.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = read_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_limits(), ApiLimits::default());
        assert_eq!(config.start_fmt().unwrap().to_string(), "perks__surv");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[api]\nlabels_limit = 500\n\n[session]\nmodel_type = \"addons\"\norientation = \"killer\"\n",
        )
        .unwrap();
        let config = read_config(&path).unwrap();
        assert_eq!(config.api.labels_limit, 500);
        assert_eq!(config.api.matches_limit, 3_000);
        assert_eq!(config.api.host, "http://127.0.0.1:8000");
        assert_eq!(config.start_fmt().unwrap().to_string(), "addons__killer");
    }

    #[test]
    fn illegal_start_session_is_rejected() {
        let mut config = AppConfig::default();
        config.session.model_type = ModelType::Status;
        config.session.orientation = Orientation::Killer;
        assert!(matches!(
            config.start_fmt(),
            Err(ConfigError::InvalidSession(_))
        ));
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[api\nhost = 1").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn saved_config_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = AppConfig::default();
        config.crops.root = Some(PathBuf::from("/data/crops"));
        config.crops.image_ext = "png".into();
        save_to_path(&config, &path).unwrap();
        assert_eq!(read_config(&path).unwrap(), config);
        let resolver = config.crop_resolver().unwrap();
        assert_eq!(resolver.root(), Path::new("/data/crops"));
    }

    #[test]
    fn blank_host_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_host_override(Some("  ".into()));
        assert_eq!(config.api.host, "http://127.0.0.1:8000");
        config.apply_host_override(Some("http://api:8000".into()));
        assert_eq!(config.api.host, "http://api:8000");
    }
}

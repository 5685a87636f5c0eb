//! Application state management for filesig config directories
//!
//! This module handles loading and managing configuration from a config
//! directory (`~/.filesig` or a custom path). The directory never holds key
//! material: the daemon generates its signing key in memory at startup.

use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "filesig";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const UPLOADS_DIR_NAME: &str = "uploads";
pub const RECEIVED_DIR_NAME: &str = "received";
/// Upload limit of a fresh config, in MiB
pub const DEFAULT_MAX_UPLOAD_MB: usize = 100;

const BYTES_PER_MIB: usize = 1024 * 1024;

/// Configuration stored in config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the App server (UI + API combined)
    #[serde(default = "default_app_port")]
    pub app_port: u16,
    /// Largest accepted upload, in MiB
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

fn default_app_port() -> u16 {
    5000
}

fn default_max_upload_mb() -> usize {
    DEFAULT_MAX_UPLOAD_MB
}

impl AppConfig {
    /// Upload limit in bytes; absurd values clamp to `usize::MAX`
    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(BYTES_PER_MIB)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_port: default_app_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

/// Application state representing a filesig config directory
#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the filesig directory (~/.filesig or custom)
    pub filesig_dir: PathBuf,
    /// Where files submitted for signing are stored
    pub uploads_path: PathBuf,
    /// Where files submitted for verification are stored
    pub received_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the filesig directory path (custom or default ~/.filesig)
    pub fn filesig_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, AppStateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(AppStateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Check if the filesig directory exists
    pub fn exists(custom_path: Option<PathBuf>) -> Result<bool, AppStateError> {
        let filesig_dir = Self::filesig_dir(custom_path)?;
        Ok(filesig_dir.exists())
    }

    /// Initialize a new filesig state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, AppStateError> {
        let filesig_dir = Self::filesig_dir(custom_path)?;

        if filesig_dir.exists() {
            return Err(AppStateError::AlreadyInitialized);
        }

        fs::create_dir_all(&filesig_dir)?;

        let uploads_path = filesig_dir.join(UPLOADS_DIR_NAME);
        fs::create_dir_all(&uploads_path)?;
        let received_path = filesig_dir.join(RECEIVED_DIR_NAME);
        fs::create_dir_all(&received_path)?;

        let config = config.unwrap_or_default();
        let config_path = filesig_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            filesig_dir,
            uploads_path,
            received_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the filesig directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, AppStateError> {
        let filesig_dir = Self::filesig_dir(custom_path)?;

        if !filesig_dir.exists() {
            return Err(AppStateError::NotInitialized);
        }

        let uploads_path = filesig_dir.join(UPLOADS_DIR_NAME);
        let received_path = filesig_dir.join(RECEIVED_DIR_NAME);
        let config_path = filesig_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(AppStateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        // storage directories are cheap to recreate if someone cleaned them up
        fs::create_dir_all(&uploads_path)?;
        fs::create_dir_all(&received_path)?;

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            filesig_dir,
            uploads_path,
            received_path,
            config_path,
            config,
        })
    }

    /// Load or initialize state from the filesig directory
    /// If not initialized, creates a new state with default or provided config
    pub fn load_or_init(
        custom_path: Option<PathBuf>,
        default_config: Option<AppConfig>,
    ) -> Result<Self, AppStateError> {
        match Self::load(custom_path.clone()) {
            Ok(state) => Ok(state),
            Err(AppStateError::NotInitialized) => Self::init(custom_path, default_config),
            Err(e) => Err(e),
        }
    }

    /// Convert to ServiceConfig for the daemon
    pub fn to_service_config(
        &self,
        app_port: Option<u16>,
        log_dir: Option<PathBuf>,
    ) -> crate::daemon::ServiceConfig {
        crate::daemon::ServiceConfig {
            signing_key: None,
            app_port: app_port.unwrap_or(self.config.app_port),
            uploads_path: self.uploads_path.clone(),
            received_path: self.received_path.clone(),
            max_upload_size_bytes: self.config.max_upload_size_bytes(),
            log_level: tracing::Level::INFO,
            log_dir,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("filesig directory not initialized. Run 'filesig init' first or use --config-path")]
    NotInitialized,

    #[error("filesig directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

use crate::core::error::{ForexError, Result as ForexResult};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://apilayer.net/api/live";
pub const DEFAULT_REPORTS_DIR: &str = "reports";

pub const API_KEY_ENV_VAR: &str = "API_KEY";
pub const BASE_URL_ENV_VAR: &str = "BASE_URL";

/// Settings handed to the quote client. Built by the caller; the client reads no globals.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        ClientConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub reports_dir: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Loads the config file (explicit path, else the default one if it exists),
    /// then applies `.env` and process environment overrides.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let path = Self::default_config_path()?;
                if path.exists() {
                    Self::load_from_path(&path)?
                } else {
                    debug!("No config file at {}, using defaults", path.display());
                    AppConfig::default()
                }
            }
        };

        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "fxreport")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Environment values win over the file; empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(api_key) = non_empty(API_KEY_ENV_VAR) {
            self.api_key = Some(api_key);
        }
        if let Some(base_url) = non_empty(BASE_URL_ENV_VAR) {
            self.base_url = Some(base_url);
        }
    }

    pub fn reports_dir(&self) -> PathBuf {
        PathBuf::from(self.reports_dir.as_deref().unwrap_or(DEFAULT_REPORTS_DIR))
    }

    pub fn client_config(&self) -> ForexResult<ClientConfig> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ForexError::Configuration(format!(
                    "{API_KEY_ENV_VAR} not found in environment variables"
                ))
            })?;

        Ok(ClientConfig {
            api_key,
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

//! Runtime configuration
//!
//! Read once at process start and injected into the gateway. The API key
//! comes from the `API_KEY` environment variable (or the config file) and
//! is never written back to disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::CopyError;

pub const API_KEY_ENV: &str = "API_KEY";
pub const MODEL_ENV: &str = "COPYWRITER_MODEL";
pub const ENDPOINT_ENV: &str = "COPYWRITER_ENDPOINT";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// Get the default config directory
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".copywriter"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load the default config file, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        match Self::config_path().and_then(|path| Self::load(&path)) {
            Ok(config) => config,
            Err(e) => {
                debug!("Failed to load config, using default: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load a config file the user named explicitly, or the default one.
    ///
    /// An explicit path must exist and parse; only the default path falls
    /// back to defaults.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::load(path)
                    .with_context(|| format!("Failed to load config file {}", path.display()))
            }
            None => Ok(Self::load_or_default()),
        }
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Overlay environment variables on top of this config
    pub fn with_env(mut self) -> Self {
        if let Some(key) = non_blank_env(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_blank_env(MODEL_ENV) {
            self.model = model;
        }
        if let Some(endpoint) = non_blank_env(ENDPOINT_ENV) {
            self.endpoint = endpoint;
        }
        self
    }

    /// Defaults plus environment, no config file
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// API key, or the remediation error when none is configured
    pub fn api_key(&self) -> Result<&str, CopyError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(CopyError::missing_api_key)
    }

    /// Validate the endpoint and return it without a trailing slash
    pub fn validated_endpoint(&self) -> Result<String, CopyError> {
        let cleaned = self.endpoint.trim().trim_end_matches('/');

        let parsed = reqwest::Url::parse(cleaned).map_err(|e| {
            CopyError::Configuration(format!("Invalid model endpoint '{}': {}", cleaned, e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CopyError::Configuration(format!(
                "Model endpoint must use http or https scheme, got: {}",
                parsed.scheme()
            )));
        }

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(CopyError::Configuration(
                "Model endpoint must not contain credentials".to_string(),
            ));
        }

        Ok(cleaned.to_string())
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! Configuration file handling
//!
//! Settings are layered: built-in defaults, then the TOML file, then the
//! `NEXT_PUBLIC_BASE_URL` environment variable, then CLI flags (applied by
//! the caller).

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::{Error, Result};

/// Environment variable that overrides the configured base URL
pub const BASE_URL_ENV: &str = "NEXT_PUBLIC_BASE_URL";

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Target API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Where the API lives and how long to wait for it
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Deployed service root, without the API prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix joined between the base URL and each endpoint
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            prefix: default_prefix(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://trustloop-5.preview.emergentagent.com".to_string()
}

fn default_prefix() -> String {
    "/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl ApiConfig {
    /// Full API root, e.g. `https://host/api`
    pub fn api_base(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.prefix.trim_end_matches('/');
        if prefix.is_empty() || prefix.starts_with('/') {
            format!("{}{}", base, prefix)
        } else {
            format!("{}/{}", base, prefix)
        }
    }

    /// Reject settings that can never produce a usable request
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base URL '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from `path`, or from the default config file
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Apply the `NEXT_PUBLIC_BASE_URL` override, if set
    pub fn apply_env(&mut self) {
        self.apply_base_url_override(std::env::var(BASE_URL_ENV).ok());
    }

    /// Replace the base URL unless the override is absent or blank
    pub fn apply_base_url_override(&mut self, base_url: Option<String>) {
        if let Some(url) = base_url {
            let url = url.trim();
            if !url.is_empty() {
                self.api.base_url = url.to_string();
            }
        }
    }
}

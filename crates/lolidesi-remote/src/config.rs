//! # Remote Configuration
//!
//! Where the inventory service lives and where local data is kept.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     LOLIDESI_BASE_URL=https://staging.example.com/los                   │
//! │     LOLIDESI_REQUEST_TIMEOUT_SECS=15                                    │
//! │     LOLIDESI_DB_PATH=/data/lolidesi.db                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/lolidesi/lolidesi.toml (Linux)                            │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     https://cu.wingscorp.com/los, no timeout                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [remote]
//! base_url = "https://cu.wingscorp.com/los"
//! request_timeout_secs = 0   # 0 = wait forever
//! user_agent = "lolidesi/0.1"
//!
//! [storage]
//! database_path = "/path/to/lolidesi.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{RemoteError, RemoteResult};

pub const DEFAULT_BASE_URL: &str = "https://cu.wingscorp.com/los";

const DATABASE_FILE: &str = "lolidesi.db";
const CONFIG_FILE: &str = "lolidesi.toml";

// =============================================================================
// Remote Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Service root. Endpoint names are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. 0 disables the timeout.
    #[serde(default)]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("lolidesi/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            base_url: default_base_url(),
            request_timeout_secs: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl RemoteSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub remote: RemoteSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl RemoteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (lolidesi.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> RemoteResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> RemoteResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| RemoteError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RemoteResult<()> {
        let url = &self.remote.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RemoteError::InvalidUrl(format!(
                "Base URL must start with http:// or https://, got: {}",
                url
            )));
        }
        Url::parse(url)?;

        if self.remote.user_agent.trim().is_empty() {
            return Err(RemoteError::InvalidConfig("user_agent must not be empty".into()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `LOLIDESI_*` overrides from `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("LOLIDESI_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.remote.base_url = url;
        }

        if let Some(timeout) = lookup("LOLIDESI_REQUEST_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.remote.request_timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric request timeout"),
            }
        }

        if let Some(path) = lookup("LOLIDESI_DB_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "wingscorp", "lolidesi")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.remote.base_url
    }

    /// Configured database file, else `<data dir>/lolidesi.db`, else the
    /// working directory.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.database_path {
            return path.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }
}

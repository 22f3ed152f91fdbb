use crate::DEFAULT_DAEMON_IPC_URL;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_DIR_NAME: &str = "vpn-client";
const CONFIG_VERSION: u32 = 1;

pub const DAEMON_URL_ENV: &str = "VPN_CLIENT_DAEMON_URL";
pub const LOG_LEVEL_ENV: &str = "VPN_CLIENT_LOG_LEVEL";

// ============================================
// ENUMS WITH DEFAULTS
// ============================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Debug for debug builds, Info for release.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DaemonConfig {
    #[serde(default = "default_ipc_url")]
    pub ipc_url: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            ipc_url: default_ipc_url(),
        }
    }
}

/// Exponential backoff bounds used when the service connection drops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconnectConfig {
    #[serde(default = "default_initial_interval_ms")]
    pub initial_interval_ms: u64,
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
    /// `0` retries forever.
    #[serde(default = "default_max_elapsed_secs")]
    pub max_elapsed_secs: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: default_initial_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            max_elapsed_secs: default_max_elapsed_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `None` picks the build default.
    #[serde(default)]
    pub level: Option<LogLevel>,
}

impl LoggingConfig {
    pub fn effective_level(&self) -> LogLevel {
        self.level.unwrap_or_else(LogLevel::build_default)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub daemon: DaemonConfig,

    #[serde(default)]
    pub reconnect: ReconnectConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            daemon: DaemonConfig::default(),
            reconnect: ReconnectConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_ipc_url() -> String {
    DEFAULT_DAEMON_IPC_URL.to_string()
}
fn default_initial_interval_ms() -> u64 {
    500
}
fn default_max_interval_ms() -> u64 {
    30_000
}
fn default_max_elapsed_secs() -> u64 {
    0
}

// ============================================
// IMPLEMENTATION
// ============================================

/// Platform config directory for the client, e.g. `~/.config/vpn-client`.
///
/// # Errors
///
/// Returns [`ConfigError::DirectoryNotFound`] if the platform has no config
/// directory.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
            reason: String::from("Platform has no config directory"),
        })
}

impl ClientConfig {
    /// Load config from {config_dir}/config.json.
    ///
    /// A missing file yields defaults. A file that exists but cannot be read,
    /// parsed or validated is an error.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Read {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        let config: ClientConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {e}");
            ConfigError::Parse {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/config.json using atomic write
    /// (temp file + rename).
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Apply `VPN_CLIENT_DAEMON_URL` and `VPN_CLIENT_LOG_LEVEL`, then
    /// revalidate. An unparseable log level is ignored with a warning.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var(DAEMON_URL_ENV) {
            info!("Using {DAEMON_URL_ENV} override: {url}");
            self.daemon.ipc_url = url;
        }

        if let Ok(level) = env::var(LOG_LEVEL_ENV) {
            match LogLevel::parse(&level) {
                Some(level) => self.logging.level = Some(level),
                None => warn!("Ignoring unknown {LOG_LEVEL_ENV} value {level:?}"),
            }
        }

        self.validate()
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        let url = Url::parse(&self.daemon.ipc_url).map_err(|e| ConfigError::Validation {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid daemon URL {}: {e}", self.daemon.ipc_url),
        })?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Daemon URL must use ws:// or wss://: {url}"),
            });
        }

        let reconnect = &self.reconnect;
        if reconnect.initial_interval_ms == 0 {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                reason: String::from("reconnect.initial_interval_ms must be positive"),
            });
        }
        if reconnect.max_interval_ms < reconnect.initial_interval_ms {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "reconnect.max_interval_ms ({}) is below initial_interval_ms ({})",
                    reconnect.max_interval_ms, reconnect.initial_interval_ms
                ),
            });
        }

        Ok(())
    }
}

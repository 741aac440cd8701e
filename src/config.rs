use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// TfL Unified API client configuration
    #[serde(default)]
    pub tfl: TflConfig,
    /// Directory holding the persisted preference blobs
    #[serde(default = "Config::default_prefs_dir")]
    pub prefs_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tfl: TflConfig::default(),
            prefs_dir: Self::default_prefs_dir(),
        }
    }
}

/// Configuration for the TfL Unified API client
#[derive(Debug, Clone, Deserialize)]
pub struct TflConfig {
    /// API base URL (default: the public TfL endpoint)
    #[serde(default = "TflConfig::default_base_url")]
    pub base_url: String,
    /// Application id sent as the `app_id` query parameter
    #[serde(default)]
    pub app_id: String,
    /// Application key sent as the `app_key` query parameter
    #[serde(default)]
    pub app_key: String,
    /// Overall request timeout in seconds (default: 30)
    #[serde(default = "TflConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds (default: 10)
    #[serde(default = "TflConfig::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Maximum concurrent requests to the API (default: 10)
    #[serde(default = "TflConfig::default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

impl Default for TflConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            app_id: String::new(),
            app_key: String::new(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            connect_timeout_secs: Self::default_connect_timeout_secs(),
            max_concurrent_requests: Self::default_max_concurrent_requests(),
        }
    }
}

impl TflConfig {
    fn default_base_url() -> String {
        "https://api.tfl.gov.uk".to_string()
    }
    fn default_request_timeout_secs() -> u64 {
        30
    }
    fn default_connect_timeout_secs() -> u64 {
        10
    }
    fn default_max_concurrent_requests() -> usize {
        10
    }
}

impl Config {
    fn default_prefs_dir() -> String {
        "preferences".to_string()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

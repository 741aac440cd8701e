//! Durable user preference blobs.
//!
//! Two JSON-array blobs under well-known keys: the home search filters
//! (transport modes) and the map line filters (line ids). Each key is one
//! file, read and written as a unit. Absent or malformed data silently
//! resets to the hardcoded defaults.

use std::path::PathBuf;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

use crate::models::modes::{self, LineMode};

pub const HOME_FILTERS_KEY: &str = "home.filters";
pub const MAP_LINE_FILTERS_KEY: &str = "map.lineFilters";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Failed to write preference blob: {0}")]
    WriteError(#[from] std::io::Error),
    #[error("Failed to encode preference blob: {0}")]
    EncodeError(#[from] serde_json::Error),
}

/// File-backed key/value store for preference blobs, one JSON file per key.
/// Access is read-modify-write over shared files; the mutex keeps it to a
/// single writer at a time.
pub struct PreferenceStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    /// The transport modes searched from the home screen.
    pub async fn home_filters(&self) -> Vec<LineMode> {
        self.read_or(HOME_FILTERS_KEY, default_home_filters).await
    }

    pub async fn set_home_filters(&self, filters: &[LineMode]) -> Result<(), PrefsError> {
        self.write(HOME_FILTERS_KEY, &filters).await
    }

    /// The line ids drawn on the line map.
    pub async fn map_line_filters(&self) -> Vec<String> {
        self.read_or(MAP_LINE_FILTERS_KEY, default_map_line_filters)
            .await
    }

    pub async fn set_map_line_filters(&self, lines: &[String]) -> Result<(), PrefsError> {
        self.write(MAP_LINE_FILTERS_KEY, &lines).await
    }

    async fn read_or<T: DeserializeOwned>(&self, key: &str, default: fn() -> T) -> T {
        let _guard = self.lock.lock().await;
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key, error = %e, "Corrupt preference blob, resetting to defaults");
                    default()
                }
            },
            Err(_) => default(),
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PrefsError> {
        let _guard = self.lock.lock().await;
        std::fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string(value)?;
        std::fs::write(self.key_path(key), raw)?;
        Ok(())
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

/// The hardcoded default search filter set (cutover-aware).
pub fn default_home_filters() -> Vec<LineMode> {
    modes::search_modes_at(Utc::now())
}

/// The hardcoded default set of lines drawn on the line map.
pub fn default_map_line_filters() -> Vec<String> {
    [
        "bakerloo",
        "central",
        "circle",
        "district",
        "dlr",
        "elizabeth",
        "hammersmith-city",
        "jubilee",
        "london-overground",
        "metropolitan",
        "northern",
        "piccadilly",
        "victoria",
        "waterloo-city",
    ]
    .iter()
    .map(|id| id.to_string())
    .collect()
}

/// Terminal front end settings, loaded from an optional JSON file
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use parametrix_core::ViewConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Which view the terminal shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    #[serde(rename = "2d", alias = "flat")]
    Flat,
    #[serde(rename = "3d", alias = "solid")]
    Solid,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Flat => ViewMode::Solid,
            ViewMode::Solid => ViewMode::Flat,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Flat => "2D",
            ViewMode::Solid => "3D",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Flat view settings. The canvas size is replaced by the terminal size
    /// on every frame; `unit` is in columns per world unit.
    pub view: ViewConfig,
    pub poll_interval_ms: u64,
    pub start_view: ViewMode,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig {
                unit: 2.0,
                axis_extent: 15.0,
                ..ViewConfig::compact()
            },
            poll_interval_ms: 500,
            start_view: ViewMode::Flat,
        }
    }
}

impl TerminalConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Shape file watcher
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parametrix_core::ShapeList;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read shapes {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid shapes file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A JSON shape file read as whole snapshots. A reload happens only when the
/// modification time moves.
pub struct ShapeSource {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl ShapeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            modified: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&mut self) -> Result<ShapeList, SourceError> {
        self.modified = self.modified_time();
        let text = fs::read_to_string(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;
        let shapes = ShapeList::from_json(&text).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), shapes = shapes.len(), "loaded shape snapshot");
        Ok(shapes)
    }

    /// New snapshot if the file changed since the last load.
    pub fn poll(&mut self) -> Result<Option<ShapeList>, SourceError> {
        let modified = self.modified_time();
        if modified.is_some() && modified == self.modified {
            return Ok(None);
        }
        debug!(path = %self.path.display(), "shape file changed");
        self.load().map(Some)
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

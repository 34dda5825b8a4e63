// Graph snapshot persistence

use pagerank_crawler::LinkGraph;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt snapshot {path}: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The snapshot file was created or replaced.
    Written,
    /// An identical snapshot was already on disk; the file was left alone.
    Unchanged,
}

/// JSON file holding a crawled [`LinkGraph`].
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<LinkGraph> {
        let content = fs::read_to_string(&self.path).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SnapshotError::Serde {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes `graph` unless the snapshot on disk already holds the same graph.
    ///
    /// An existing snapshot that cannot be read or parsed is an error, not a
    /// reason to overwrite it.
    pub fn save(&self, graph: &LinkGraph) -> Result<SaveOutcome> {
        if self.exists() && self.load()? == *graph {
            info!("Snapshot {} is unchanged, skipping write", self.path.display());
            return Ok(SaveOutcome::Unchanged);
        }

        self.write(graph)?;
        Ok(SaveOutcome::Written)
    }

    fn write(&self, graph: &LinkGraph) -> Result<()> {
        info!("Saving {} pages to {}", graph.len(), self.path.display());

        let content = serde_json::to_string_pretty(graph).map_err(|source| SnapshotError::Serde {
            path: self.path.clone(),
            source,
        })?;

        fs::write(&self.path, content).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

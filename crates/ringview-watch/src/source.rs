//! Where snapshots come from.
//!
//! The watcher never talks to the ledger itself. Something else fetches
//! and decodes the account and leaves the result where a
//! [`SnapshotSource`] can pick it up.

use std::path::{Path, PathBuf};

use ringview_core::EventQueueSnapshot;

/// Errors that can occur while loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The snapshot could not be read.
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON or fails validation.
    #[error("failed to decode snapshot {path}: {source}")]
    Decode {
        /// File that failed to decode.
        path: PathBuf,
        /// The underlying decode error.
        source: serde_json::Error,
    },
}

/// Produces a fresh snapshot on demand.
pub trait SnapshotSource {
    /// Load the latest snapshot.
    fn load(&self) -> impl Future<Output = Result<EventQueueSnapshot, SourceError>> + Send;
}

/// Reads decoded snapshots from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for JsonFileSource {
    async fn load(&self) -> Result<EventQueueSnapshot, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

//! Error types for the manifest module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or persisting the manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Opening, reading, or rewriting the backing file failed.
    #[error("Manifest I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backing file has content that is not a valid manifest.
    #[error("Manifest at {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Serializing the in-memory manifest failed.
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ManifestError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

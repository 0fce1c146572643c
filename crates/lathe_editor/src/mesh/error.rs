//! Error types for mesh I/O

use std::path::PathBuf;

use thiserror::Error;

/// Mesh I/O errors
#[derive(Debug, Error)]
pub enum MeshError {
    /// No registered reader or writer handles this extension
    #[error("Unsupported mesh format: {0:?}")]
    UnsupportedFormat(PathBuf),

    /// The reader could not decode the file
    #[error("Failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Mesh I/O error: {0}")]
    Io(#[from] std::io::Error),
}

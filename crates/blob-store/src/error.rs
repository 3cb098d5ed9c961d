//! Error types for the blob store.

use std::path::PathBuf;

/// Errors that can occur when working with the blob volume.
#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    /// No blob exists at the given path
    #[error("blob not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured volume root is unusable
    #[error("invalid volume root: {}", .0.display())]
    InvalidRoot(PathBuf),
}

impl BlobStoreError {
    /// Whether the failure is a missing blob, as opposed to a volume fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlobStoreError::NotFound(_))
    }
}

/// Result type alias for blob store operations.
pub type Result<T> = std::result::Result<T, BlobStoreError>;

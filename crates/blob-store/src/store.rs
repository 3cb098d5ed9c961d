use std::path::{Path, PathBuf};

use bytes::Bytes;
use uuid::Uuid;

use crate::error::{BlobStoreError, Result};

/// Derive the deterministic path of a size variant from its base blob path.
///
/// This is a pure string transform; it does not check that anything exists
/// at the returned path.
pub fn variant_path(base: &Path, size: u32) -> PathBuf {
    let mut raw = base.as_os_str().to_owned();
    raw.push(format!("_{}", size));
    PathBuf::from(raw)
}

/// Local-volume blob store.
///
/// Every stored blob gets a fresh UUID filename so concurrent writers can
/// never collide and original file names never leak onto the filesystem.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Open a blob store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|_| BlobStoreError::InvalidRoot(root.clone()))?;
        Ok(Self { root })
    }

    /// Write a new blob under a freshly generated opaque name.
    ///
    /// The write is atomic from the caller's perspective: the payload lands
    /// in a temporary file first and is renamed into place, so a returned
    /// path is always readable in full and a failed call leaves nothing
    /// visible at the returned path.
    pub async fn store(&self, data: Bytes) -> Result<PathBuf> {
        let path = self.root.join(Uuid::new_v4().to_string());
        let bytes = data.len();
        self.write_atomic(&path, data).await?;
        tracing::debug!(path = %path.display(), bytes, "stored blob");
        Ok(path)
    }

    /// Write (or overwrite) a blob at an exact path, atomically.
    ///
    /// Used for size variants, whose paths are derived from the base blob
    /// rather than generated. Re-running a derivation lands on the same
    /// path, last write wins.
    pub async fn put(&self, path: &Path, data: Bytes) -> Result<()> {
        self.write_atomic(path, data).await
    }

    /// Read the full contents of a blob.
    pub async fn read(&self, path: &Path) -> Result<Bytes> {
        match tokio::fs::read(path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobStoreError::NotFound(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_atomic(&self, path: &Path, data: Bytes) -> Result<()> {
        // Temp file lives next to the target so the rename stays on one
        // filesystem and is therefore atomic.
        let tmp = self.root.join(format!(".tmp-{}", Uuid::new_v4()));
        tokio::fs::write(&tmp, &data).await?;
        match tokio::fs::rename(&tmp, path).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "blob rename failed");
                let _ = tokio::fs::remove_file(&tmp).await;
                Err(e.into())
            }
        }
    }
}

//! Blob storage on a local volume.
//!
//! Blobs are written under opaque, freshly generated names that carry no
//! relation to the logical file name they back. Derived renditions of a blob
//! live at deterministic sibling paths (`<base>_<size>`), so the write path
//! and every later read path agree on naming without any extra bookkeeping.

mod error;
mod store;

pub use error::{BlobStoreError, Result};
pub use store::{variant_path, BlobStore};

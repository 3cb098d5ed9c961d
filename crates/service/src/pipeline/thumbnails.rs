use std::io::Cursor;

use blob_store::{variant_path, BlobStore};
use bytes::Bytes;
use image::ImageFormat;

use crate::database::models::File;
use crate::database::types::FileKind;
use crate::database::Database;

use super::Job;

/// Target widths for derived renditions.
pub const THUMBNAIL_WIDTHS: [u32; 3] = [500, 250, 100];

/// How a job failed.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// A data precondition does not hold (wrong kind, missing record or
    /// base blob, undecodable image). Never retried.
    #[error("{0}")]
    Permanent(String),

    /// A resource fault that may clear up (volume or database unavailable).
    /// Eligible for bounded redelivery.
    #[error(transparent)]
    Transient(anyhow::Error),
}

impl From<sqlx::Error> for JobError {
    fn from(e: sqlx::Error) -> Self {
        JobError::Transient(e.into())
    }
}

/// Derive all configured size variants for one file.
///
/// Idempotent: re-running the same job writes the same bytes to the same
/// deterministic paths. A failure on one size does not stop the others; if
/// any size fails transiently the whole job is reported transient so the
/// queue can redeliver it (already-written sizes are simply rewritten).
pub async fn process_job(db: &Database, blobs: &BlobStore, job: &Job) -> Result<(), JobError> {
    let file = File::get_for_user(job.file_id, job.owner_id, db)
        .await?
        .ok_or_else(|| JobError::Permanent(format!("file {} not found", job.file_id)))?;

    if file.kind != FileKind::Image {
        return Err(JobError::Permanent(format!(
            "file {} is a {}, not an image",
            file.id, file.kind
        )));
    }

    // Schema guarantees images carry a path; a missing one is corrupt data.
    let base_path = file
        .blob_path()
        .ok_or_else(|| JobError::Permanent(format!("image {} has no blob path", file.id)))?;

    let base = match blobs.read(&base_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.is_not_found() => {
            return Err(JobError::Permanent(format!(
                "base blob missing for image {}",
                file.id
            )));
        }
        Err(e) => return Err(JobError::Transient(e.into())),
    };

    let mut transient: Option<anyhow::Error> = None;
    for width in THUMBNAIL_WIDTHS {
        let rendered = match render_variant(&base, width) {
            Ok(bytes) => bytes,
            Err(e) => {
                // Undecodable content will never decode on retry.
                return Err(JobError::Permanent(format!(
                    "image {} cannot be decoded: {e}",
                    file.id
                )));
            }
        };

        let target = variant_path(&base_path, width);
        if let Err(e) = blobs.put(&target, Bytes::from(rendered)).await {
            tracing::warn!(file_id = %file.id, width, error = %e, "variant write failed");
            transient.get_or_insert(e.into());
        }
    }

    match transient {
        Some(e) => Err(JobError::Transient(e)),
        None => Ok(()),
    }
}

/// Resize the base image to fit within `width` in both dimensions,
/// re-encoded in its original format.
fn render_variant(base: &[u8], width: u32) -> Result<Vec<u8>, image::ImageError> {
    let format = image::guess_format(base)?;
    let img = image::load_from_memory_with_format(base, format)?;
    let thumb = img.thumbnail(width, width);

    let mut out = Cursor::new(Vec::new());
    // GIF/WebP encoders in this build are limited; fall back to PNG there.
    let out_format = match format {
        ImageFormat::Png | ImageFormat::Jpeg => format,
        _ => ImageFormat::Png,
    };
    thumb.write_to(&mut out, out_format)?;
    Ok(out.into_inner())
}

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use blob_store::{variant_path, BlobStoreError};

use crate::access::{evaluate_content_access, ContentAccess};
use crate::database::models::File;
use crate::http_server::api::json_error;
use crate::http_server::extract::OptionalUser;
use crate::ServiceState;

#[derive(Debug, Clone, Deserialize)]
pub struct DataQuery {
    /// Requested variant width; absent means the original content.
    pub size: Option<u32>,
}

/// Serve a file's content, or one of its derived size variants.
///
/// Authentication is optional: public files are fetchable anonymously.
/// Permission denial is reported as Not-Found so private files cannot be
/// probed for existence.
pub async fn handler(
    State(state): State<ServiceState>,
    OptionalUser(requester): OptionalUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DataQuery>,
) -> Result<impl IntoResponse, DataError> {
    let file = File::get(id, state.database())
        .await?
        .ok_or(DataError::NotFound)?;

    match evaluate_content_access(&file, requester) {
        ContentAccess::Allowed => {}
        ContentAccess::Denied => return Err(DataError::NotFound),
        ContentAccess::NotContentBearing => return Err(DataError::FolderHasNoContent),
    }

    // The access check already rejected folders, so a missing path here is
    // a corrupt record, not a client error.
    let base_path = file.blob_path().ok_or(DataError::MissingBlobPath(id))?;
    let path = match query.size {
        // A variant the pipeline has not generated (or an unconfigured
        // size) reads as Not-Found; the caller may retry later.
        Some(size) => variant_path(&base_path, size),
        None => base_path,
    };

    let content = state.blobs().read(&path).await.map_err(|e| {
        if e.is_not_found() {
            DataError::NotFound
        } else {
            DataError::Blobs(e)
        }
    })?;

    // Content type comes from the logical name, never the opaque path.
    let mime = mime_guess::from_path(&file.name).first_or_octet_stream();

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(content))
        .map_err(|_| DataError::MissingBlobPath(id))?)
}

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// True absence, permission denial, and a missing variant all look the
    /// same from outside.
    #[error("Not found")]
    NotFound,
    #[error("A folder doesn't have content")]
    FolderHasNoContent,
    #[error("record {0} has no blob path")]
    MissingBlobPath(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("blob store error: {0}")]
    Blobs(BlobStoreError),
}

impl IntoResponse for DataError {
    fn into_response(self) -> Response {
        match self {
            DataError::NotFound => json_error(StatusCode::NOT_FOUND, "Not found"),
            DataError::FolderHasNoContent => {
                json_error(StatusCode::BAD_REQUEST, "A folder doesn't have content")
            }
            DataError::MissingBlobPath(id) => {
                tracing::error!(file_id = %id, "content record missing blob path");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            DataError::Database(e) => {
                tracing::error!(error = %e, "content read failed on metadata store");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            DataError::Blobs(e) => {
                tracing::error!(error = %e, "content read failed on blob volume");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

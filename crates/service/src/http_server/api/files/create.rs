use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use bytes::Bytes;
use serde::Deserialize;
use uuid::Uuid;

use blob_store::BlobStoreError;

use crate::database::models::File;
use crate::database::types::FileKind;
use crate::http_server::api::{files::FileResponse, json_error};
use crate::http_server::extract::RequireUser;
use crate::ServiceState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub is_public: Option<bool>,
    /// Base64-encoded payload; required for non-folders, forbidden for
    /// folders.
    pub data: Option<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    RequireUser(user_id): RequireUser,
    Json(request): Json<CreateRequest>,
) -> Result<impl IntoResponse, CreateError> {
    let name = match request.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(CreateError::MissingName),
    };

    let kind = request.kind.as_deref().ok_or(CreateError::MissingType)?;
    let kind = FileKind::parse(kind).ok_or(CreateError::InvalidType)?;

    // Strict rule: folders must not carry data, everything else must.
    match (kind, &request.data) {
        (FileKind::Folder, Some(_)) | (FileKind::File | FileKind::Image, None) => {
            return Err(CreateError::MissingData);
        }
        _ => {}
    }

    // A non-root parent must exist and must be a folder.
    if let Some(parent_id) = request.parent_id {
        let parent = File::get(parent_id, state.database())
            .await?
            .ok_or(CreateError::ParentNotFound)?;
        if parent.kind != FileKind::Folder {
            return Err(CreateError::ParentNotFolder);
        }
    }

    let is_public = request.is_public.unwrap_or(false);

    let file = match kind.content_kind() {
        None => {
            File::create_folder(user_id, name, is_public, request.parent_id, state.database())
                .await?
        }
        Some(content_kind) => {
            let encoded = request.data.as_deref().unwrap_or_default();
            let payload = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(CreateError::InvalidData)?;

            // Blob first, metadata second: a record must never point at a
            // blob that was not written.
            let local_path = state.blobs().store(Bytes::from(payload)).await?;
            let file = File::create_content(
                user_id,
                name,
                content_kind,
                is_public,
                request.parent_id,
                &local_path,
                state.database(),
            )
            .await?;

            // Fire-and-forget; derivation happens off the request path.
            if let Err(e) = state.jobs().dispatch(user_id, *file.id) {
                tracing::error!(file_id = %file.id, error = %e, "failed to enqueue derivation job");
            }

            file
        }
    };

    Ok((StatusCode::CREATED, Json(FileResponse::from(&file))))
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("Missing name")]
    MissingName,
    #[error("Missing type")]
    MissingType,
    #[error("Invalid type")]
    InvalidType,
    #[error("Missing data")]
    MissingData,
    #[error("Invalid data")]
    InvalidData(#[source] base64::DecodeError),
    #[error("Parent not found")]
    ParentNotFound,
    #[error("Parent is not a folder")]
    ParentNotFolder,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("blob store error: {0}")]
    Blobs(#[from] BlobStoreError),
}

impl IntoResponse for CreateError {
    fn into_response(self) -> Response {
        match self {
            CreateError::MissingName
            | CreateError::MissingType
            | CreateError::InvalidType
            | CreateError::MissingData
            | CreateError::ParentNotFound
            | CreateError::ParentNotFolder => {
                json_error(StatusCode::BAD_REQUEST, &self.to_string())
            }
            CreateError::InvalidData(_) => json_error(StatusCode::BAD_REQUEST, "Invalid data"),
            CreateError::Database(e) => {
                tracing::error!(error = %e, "create failed on metadata store");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            CreateError::Blobs(e) => {
                tracing::error!(error = %e, "create failed on blob volume");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::database::models::File;
use crate::http_server::api::{files::FileResponse, json_error};
use crate::http_server::extract::RequireUser;
use crate::ServiceState;

pub async fn publish_handler(
    state: State<ServiceState>,
    user: RequireUser,
    id: Path<Uuid>,
) -> Result<impl IntoResponse, PublishError> {
    set_visibility(state, user, id, true).await
}

pub async fn unpublish_handler(
    state: State<ServiceState>,
    user: RequireUser,
    id: Path<Uuid>,
) -> Result<impl IntoResponse, PublishError> {
    set_visibility(state, user, id, false).await
}

async fn set_visibility(
    State(state): State<ServiceState>,
    RequireUser(user_id): RequireUser,
    Path(id): Path<Uuid>,
    is_public: bool,
) -> Result<Response, PublishError> {
    let file = File::set_public(id, user_id, is_public, state.database())
        .await?
        .ok_or(PublishError::NotFound)?;

    Ok((StatusCode::OK, Json(FileResponse::from(&file))).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for PublishError {
    fn into_response(self) -> Response {
        match self {
            PublishError::NotFound => json_error(StatusCode::NOT_FOUND, "Not found"),
            PublishError::Database(e) => {
                tracing::error!(error = %e, "visibility update failed on metadata store");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

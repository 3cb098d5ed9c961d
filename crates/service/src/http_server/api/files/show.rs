use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::database::models::File;
use crate::http_server::api::{files::FileResponse, json_error};
use crate::http_server::extract::RequireUser;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    RequireUser(user_id): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ShowError> {
    // Owner-scoped: a foreign or nonexistent id is the same Not-Found.
    let file = File::get_for_user(id, user_id, state.database())
        .await?
        .ok_or(ShowError::NotFound)?;

    Ok((StatusCode::OK, Json(FileResponse::from(&file))))
}

#[derive(Debug, thiserror::Error)]
pub enum ShowError {
    #[error("Not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ShowError {
    fn into_response(self) -> Response {
        match self {
            ShowError::NotFound => json_error(StatusCode::NOT_FOUND, "Not found"),
            ShowError::Database(e) => {
                tracing::error!(error = %e, "show failed on metadata store");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

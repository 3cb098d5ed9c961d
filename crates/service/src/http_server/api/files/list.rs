use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::File;
use crate::http_server::api::{files::FileResponse, json_error};
use crate::http_server::extract::RequireUser;
use crate::ServiceState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Parent folder to list under; absent means the root.
    pub parent_id: Option<Uuid>,
    /// Zero-based page index.
    pub page: Option<i64>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    RequireUser(user_id): RequireUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ListError> {
    let files = File::list_for_user(
        user_id,
        query.parent_id,
        query.page.unwrap_or(0),
        state.database(),
    )
    .await?;

    let records: Vec<FileResponse> = files.iter().map(FileResponse::from).collect();
    Ok((StatusCode::OK, Json(records)))
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        match self {
            ListError::Database(e) => {
                tracing::error!(error = %e, "list failed on metadata store");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

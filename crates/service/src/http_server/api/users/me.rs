use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::User;
use crate::http_server::api::json_error;
use crate::http_server::extract::RequireUser;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    RequireUser(user_id): RequireUser,
) -> Result<impl IntoResponse, MeError> {
    // A token whose identity record has vanished reads the same as a bad
    // token.
    let user = User::get(user_id, state.database())
        .await?
        .ok_or(MeError::Unauthorized)?;

    Ok((
        StatusCode::OK,
        Json(MeResponse {
            id: *user.id,
            email: user.email,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum MeError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for MeError {
    fn into_response(self) -> Response {
        match self {
            MeError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "Unauthorized"),
            MeError::Database(e) => {
                tracing::error!(error = %e, "identity lookup failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

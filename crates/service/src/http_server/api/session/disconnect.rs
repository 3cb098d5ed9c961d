use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http_server::api::json_error;
use crate::http_server::extract::TOKEN_HEADER;
use crate::ServiceState;

/// Invalidate the presented session token.
pub async fn handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, DisconnectError> {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(DisconnectError::Unauthorized)?;

    if !state.sessions().destroy(token).await {
        return Err(DisconnectError::Unauthorized);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, thiserror::Error)]
pub enum DisconnectError {
    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for DisconnectError {
    fn into_response(self) -> Response {
        match self {
            DisconnectError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "Unauthorized"),
        }
    }
}

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use serde::Serialize;

use crate::auth::verify_password;
use crate::database::models::User;
use crate::http_server::api::json_error;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize)]
pub struct ConnectResponse {
    pub token: String,
}

/// Exchange HTTP Basic credentials for a session token.
pub async fn handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ConnectError> {
    let (email, password) = basic_credentials(&headers).ok_or(ConnectError::Unauthorized)?;

    let user = User::by_email(&email, state.database())
        .await?
        .ok_or(ConnectError::Unauthorized)?;
    if !verify_password(&password, &user.password_digest) {
        return Err(ConnectError::Unauthorized);
    }

    let token = state.sessions().create(*user.id).await;
    Ok((StatusCode::OK, Json(ConnectResponse { token })))
}

/// Parse an `Authorization: Basic <base64(email:password)>` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    // Passwords may contain ':'; only the first one separates the email.
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Bad header, unknown email, and wrong password are indistinguishable.
    #[error("Unauthorized")]
    Unauthorized,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ConnectError {
    fn into_response(self) -> Response {
        match self {
            ConnectError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "Unauthorized"),
            ConnectError::Database(e) => {
                tracing::error!(error = %e, "login failed on metadata store");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

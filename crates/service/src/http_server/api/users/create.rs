use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::digest_password;
use crate::database::models::User;
use crate::http_server::api::json_error;
use crate::ServiceState;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserResponse {
    pub id: Uuid,
    pub email: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, CreateUserError> {
    let email = match request.email.as_deref() {
        Some(email) if !email.is_empty() => email,
        _ => return Err(CreateUserError::MissingEmail),
    };
    let password = match request.password.as_deref() {
        Some(password) if !password.is_empty() => password,
        _ => return Err(CreateUserError::MissingPassword),
    };

    if User::by_email(email, state.database()).await?.is_some() {
        return Err(CreateUserError::AlreadyExists);
    }

    let user = User::create(email, &digest_password(password), state.database()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            id: *user.id,
            email: user.email,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("Missing email")]
    MissingEmail,
    #[error("Missing password")]
    MissingPassword,
    #[error("User already exists")]
    AlreadyExists,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for CreateUserError {
    fn into_response(self) -> Response {
        match self {
            CreateUserError::MissingEmail
            | CreateUserError::MissingPassword
            | CreateUserError::AlreadyExists => {
                json_error(StatusCode::BAD_REQUEST, &self.to_string())
            }
            CreateUserError::Database(e) => {
                tracing::error!(error = %e, "user creation failed on metadata store");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

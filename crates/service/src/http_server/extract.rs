//! Session token extractors.
//!
//! Tokens arrive in the `X-Token` request header. [`RequireUser`] rejects
//! with a uniform 401 when the header is missing or the token does not
//! resolve; [`OptionalUser`] never rejects, since content reads must work
//! anonymously for public files.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::ServiceState;

/// Request header carrying the session token.
pub const TOKEN_HEADER: &str = "x-token";

/// Uniform rejection for every authentication failure. Deliberately does
/// not say whether the token was absent, expired, or unknown.
#[derive(Debug)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Unauthorized" })),
        )
            .into_response()
    }
}

async fn resolve_token(parts: &Parts, state: &ServiceState) -> Option<Uuid> {
    let token = parts
        .headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())?;
    state.sessions().authenticate(token).await
}

/// The authenticated requester's user id.
#[derive(Debug, Clone, Copy)]
pub struct RequireUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    ServiceState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = ServiceState::from_ref(state);
        resolve_token(parts, &state)
            .await
            .map(RequireUser)
            .ok_or(Unauthorized)
    }
}

/// The requester's user id when a valid token was presented, None otherwise.
#[derive(Debug, Clone, Copy)]
pub struct OptionalUser(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    ServiceState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = ServiceState::from_ref(state);
        Ok(OptionalUser(resolve_token(parts, &state).await))
    }
}

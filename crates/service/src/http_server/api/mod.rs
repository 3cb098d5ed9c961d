use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum::Router;

pub mod files;
pub mod session;
pub mod users;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(session::router(state.clone()))
        .nest("/users", users::router(state.clone()))
        .nest("/files", files::router(state.clone()))
        .with_state(state)
}

/// Small structured error payload: `{"error": "<message>"}`.
///
/// Internal failure details (paths, backend errors) never pass through
/// here; callers map them to a generic message first.
pub(crate) fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

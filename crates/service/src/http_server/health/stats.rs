use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::database::models::{File, User};
use crate::http_server::api::json_error;
use crate::ServiceState;

/// Collection counts.
pub async fn handler(State(state): State<ServiceState>) -> Response {
    let users = User::count(state.database()).await;
    let files = File::count(state.database()).await;

    match (users, files) {
        (Ok(users), Ok(files)) => {
            let msg = serde_json::json!({ "users": users, "files": files });
            (StatusCode::OK, Json(msg)).into_response()
        }
        (users, files) => {
            if let Err(e) = users.and(files) {
                tracing::error!(error = %e, "stats query failed");
            }
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

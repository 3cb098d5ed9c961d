use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::time::Duration;
use tokio::time::timeout;

use crate::ServiceState;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Liveness of the backing stores.
pub async fn handler(State(state): State<ServiceState>) -> Response {
    let db_alive = matches!(
        timeout(HEALTH_CHECK_TIMEOUT, state.database().is_alive()).await,
        Ok(true)
    );
    let cache_alive = state.sessions().is_alive();

    if db_alive && cache_alive {
        let msg = serde_json::json!({ "cache": true, "db": true });
        (StatusCode::OK, Json(msg)).into_response()
    } else {
        let msg = serde_json::json!({ "cache": cache_alive, "db": db_alive });
        (StatusCode::SERVICE_UNAVAILABLE, Json(msg)).into_response()
    }
}

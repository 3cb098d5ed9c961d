use axum::routing::get;
use axum::Router;

pub mod stats;
pub mod status;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/status", get(status::handler))
        .route("/stats", get(stats::handler))
        .with_state(state)
}

use axum::routing::{get, post};
use axum::Router;

pub mod create;
pub mod me;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", post(create::handler))
        .route("/me", get(me::handler))
        .with_state(state)
}

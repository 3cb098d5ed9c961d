use axum::routing::get;
use axum::Router;

pub mod connect;
pub mod disconnect;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/connect", get(connect::handler))
        .route("/disconnect", get(disconnect::handler))
        .with_state(state)
}

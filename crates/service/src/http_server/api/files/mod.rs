use axum::routing::{get, post, put};
use axum::Router;
use http::header::{ACCEPT, ORIGIN};
use http::Method;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

pub mod create;
pub mod data;
pub mod list;
pub mod publish;
pub mod show;

use crate::database::models::File;
use crate::database::types::FileKind;
use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    // Content reads are fetchable anonymously (public files), so they get
    // a permissive GET-only CORS layer.
    let data_cors = CorsLayer::new()
        .allow_methods(vec![Method::GET])
        .allow_headers(vec![ACCEPT, ORIGIN])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", post(create::handler).get(list::handler))
        .route("/:id", get(show::handler))
        .route("/:id/data", get(data::handler).layer(data_cors))
        .route("/:id/publish", put(publish::publish_handler))
        .route("/:id/unpublish", put(publish::unpublish_handler))
        .with_state(state)
}

/// Client-facing shape of a file record.
///
/// The on-volume blob path is an internal detail and has no field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub is_public: bool,
    pub parent_id: Option<Uuid>,
}

impl From<&File> for FileResponse {
    fn from(file: &File) -> Self {
        Self {
            id: *file.id,
            user_id: *file.owner_id,
            name: file.name.clone(),
            kind: file.kind,
            is_public: *file.is_public,
            parent_id: file.parent_id.map(|p| *p),
        }
    }
}

use std::{path::Path, sync::Arc};

use axum::{
    body::Bytes, extract::State, http::StatusCode, response::{IntoResponse, Response}, routing::get, Json, Router
};
use serde::Serialize;
use tower_http::services::{ServeDir, ServeFile};

use server_state::ServerState;

pub mod server_state;

pub fn build_router(state: Arc<ServerState>, dist_dir: &Path) -> Router {
    Router::new()
        .nest_service("/frontend/dist", ServeDir::new(dist_dir))
        .fallback_service(ServeFile::new(dist_dir.join("index.html")))
        .route("/routes", get(get_routes))
        .route("/routes.json", get(get_routes_json))
        .route("/config", get(get_config))
        .with_state(state)
}

fn bincode_response<T: Serialize>(value: &T, what: &str) -> Response {
    match bincode::serialize(value) {
        Ok(bytes) => Bytes::from_owner(bytes).into_response(),
        Err(err) => {
            tracing::error!("Failed to encode {what}: {err:?}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_routes(State(state): State<Arc<ServerState>>) -> Response {
    bincode_response(&state.catalog, "route catalog")
}

async fn get_routes_json(State(state): State<Arc<ServerState>>) -> Response {
    Json(&state.catalog).into_response()
}

async fn get_config(State(state): State<Arc<ServerState>>) -> Response {
    bincode_response(&state.config, "walk config")
}

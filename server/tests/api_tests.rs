use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use route_walker_lib::{catalog::LA_PAZ_REGION, RouteCatalog, WalkConfig};
use server::{build_router, server_state::ServerState};
use tower::util::ServiceExt;

fn setup_app(dist: &tempfile::TempDir) -> Router {
    let state = ServerState::new(RouteCatalog::builtin(), WalkConfig::default());
    build_router(Arc::new(state), dist.path())
}

fn dist_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>walker</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('walker')").unwrap();
    dir
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

#[tokio::test]
async fn routes_are_served_as_bincode() {
    let dist = dist_dir();
    let response = setup_app(&dist).oneshot(get("/routes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body_bytes(response.into_body()).await;
    let catalog: RouteCatalog = bincode::deserialize(&bytes).unwrap();
    assert_eq!(catalog, RouteCatalog::builtin());
    assert_eq!(catalog.lookup(LA_PAZ_REGION, "maleconLaPaz").unwrap().key(), "maleconLaPaz");
}

#[tokio::test]
async fn routes_are_served_as_json() {
    let dist = dist_dir();
    let response = setup_app(&dist).oneshot(get("/routes.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body_bytes(response.into_body()).await;
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["regions"][LA_PAZ_REGION]["maleconLaPaz"]["max_distance_km"], 3.0);

    let catalog = RouteCatalog::from_json(std::str::from_utf8(&bytes).unwrap()).unwrap();
    assert_eq!(catalog.len(), 2);
}

#[tokio::test]
async fn config_is_served_as_bincode() {
    let dist = dist_dir();
    let response = setup_app(&dist).oneshot(get("/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body_bytes(response.into_body()).await;
    let config: WalkConfig = bincode::deserialize(&bytes).unwrap();
    assert_eq!(config, WalkConfig::default());
}

#[tokio::test]
async fn static_files_and_index_fallback() {
    let dist = dist_dir();

    let response = setup_app(&dist).oneshot(get("/frontend/dist/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, b"console.log('walker')");

    let response = setup_app(&dist).oneshot(get("/walk/laPazCiudadRutas")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, b"<html>walker</html>");
}

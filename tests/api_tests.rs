use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use movie_similarity_api::{
    api::{create_router, AppState},
    config::Config,
    models::RawItem,
    services::{
        catalog::{CatalogError, CatalogSource},
        BuildOptions, CorpusSnapshot,
    },
};

struct StaticCatalog(Vec<RawItem>);

impl CatalogSource for StaticCatalog {
    fn load(&self) -> Result<Vec<RawItem>, CatalogError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

struct BrokenCatalog;

impl CatalogSource for BrokenCatalog {
    fn load(&self) -> Result<Vec<RawItem>, CatalogError> {
        Err(CatalogError::Unavailable("offline".to_string()))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

fn movies() -> Vec<RawItem> {
    vec![
        RawItem::new(1, "A", "space adventure war"),
        RawItem::new(2, "B", "space war drama"),
        RawItem::new(3, "C", "romance drama family"),
    ]
}

fn create_test_server_with(catalog: Arc<dyn CatalogSource>, items: &[RawItem]) -> TestServer {
    let snapshot = CorpusSnapshot::build(items, &BuildOptions::default());
    let state = AppState::new(&Config::default(), catalog, snapshot);
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(Arc::new(StaticCatalog(movies())), &movies())
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_list_movies() {
    let server = create_test_server();
    let response = server.get("/movies").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["movies"], json!(["A", "B", "C"]));
}

#[tokio::test]
async fn test_recommend_form() {
    let server = create_test_server();
    let response = server
        .post("/recommend")
        .form(&[("movie", "A")])
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(
        body["recommendations"],
        json!([
            {"title": "B", "similarity": "0.67"},
            {"title": "C", "similarity": "0.00"}
        ])
    );
}

#[tokio::test]
async fn test_recommend_json() {
    let server = create_test_server();
    let response = server
        .post("/api/recommend")
        .json(&json!({ "movie": "C" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["recommendations"][0]["title"], "B");
    assert_eq!(body["recommendations"][0]["similarity"], "0.33");
}

#[tokio::test]
async fn test_recommend_unknown_title_is_empty() {
    let server = create_test_server();
    let response = server
        .post("/recommend")
        .form(&[("movie", "Not A Movie")])
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["recommendations"], json!([]));
}

#[tokio::test]
async fn test_rebuild_swaps_snapshot() {
    let server = create_test_server_with(Arc::new(StaticCatalog(movies())), &[]);

    let before: Value = server.get("/snapshot").await.json();
    assert_eq!(before["item_count"], 0);

    let response = server.post("/rebuild").await;
    response.assert_status_ok();
    let rebuilt: Value = response.json();
    assert_eq!(rebuilt["item_count"], 3);
    assert_eq!(rebuilt["vocabulary_size"], 6);
    assert!(rebuilt["version"].as_u64().unwrap() > before["version"].as_u64().unwrap());

    let body: Value = server
        .post("/recommend")
        .form(&[("movie", "A")])
        .await
        .json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rebuild_failure_keeps_current_snapshot() {
    let server = create_test_server_with(Arc::new(BrokenCatalog), &movies());

    let response = server.post("/rebuild").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let stats: Value = server.get("/snapshot").await.json();
    assert_eq!(stats["item_count"], 3);
}

#[tokio::test]
async fn test_concurrent_rebuild_is_rejected() {
    let snapshot = CorpusSnapshot::build(&movies(), &BuildOptions::default());
    let state = AppState::new(&Config::default(), Arc::new(StaticCatalog(movies())), snapshot);
    let rebuild_lock = state.rebuild_lock.clone();
    let server = TestServer::new(create_router(state)).unwrap();
    let before: Value = server.get("/snapshot").await.json();

    let _running = rebuild_lock.lock().await;
    let response = server.post("/rebuild").await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "Rebuild already in progress");

    let after: Value = server.get("/snapshot").await.json();
    assert_eq!(after["version"], before["version"]);
}

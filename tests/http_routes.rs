//! HTTP surface: status mapping and response shapes of the save, entries,
//! and health routes.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{test_config, Failure, ScriptedRepository};
use notion_journal::server::router;
use notion_journal::JournalService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

fn app(repo: &Arc<ScriptedRepository>) -> Router {
    let service = JournalService::with_repository(repo.clone(), &test_config());
    router(Arc::new(service))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn save_returns_id_and_message() {
    let repo = Arc::new(ScriptedRepository::new());
    let (status, body) = send(
        app(&repo),
        post_json("/save", json!({"text": "Good day. Lots done.", "rating": 9, "date": "2024-05-17"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Saved to Notion!");
    assert_eq!(body["id"], "00000000000000000000000000000001");
    assert_eq!(repo.created.lock().unwrap()[0].title, "Good day");
}

#[tokio::test]
async fn save_without_text_is_a_bad_request() {
    let repo = Arc::new(ScriptedRepository::new());
    let (status, body) = send(app(&repo), post_json("/save", json!({"title": "Empty"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("text"));
    assert_eq!(repo.create_attempts(), 0);
}

#[tokio::test]
async fn save_with_malformed_date_is_a_bad_request() {
    let repo = Arc::new(ScriptedRepository::new());
    let (status, _) = send(
        app(&repo),
        post_json("/save", json!({"text": "Hi", "date": "yesterday"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn save_with_wrong_typed_rating_is_a_bad_request() {
    let repo = Arc::new(ScriptedRepository::new());
    let (status, body) = send(
        app(&repo),
        post_json("/save", json!({"text": "Hi", "rating": "eight"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Malformed request"));
    assert_eq!(repo.create_attempts(), 0);
}

#[tokio::test]
async fn save_without_content_type_is_a_bad_request() {
    let repo = Arc::new(ScriptedRepository::new());
    let request = Request::builder()
        .method("POST")
        .uri("/save")
        .body(Body::from(json!({"text": "Hi"}).to_string()))
        .unwrap();
    let (status, body) = send(app(&repo), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(repo.create_attempts(), 0);
}

#[tokio::test]
async fn unparseable_limit_is_a_bad_request() {
    let repo = Arc::new(ScriptedRepository::with_entries(2));
    let request = Request::builder()
        .uri("/entries?limit=abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&repo), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Malformed request"));
    assert!(repo.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let repo = Arc::new(ScriptedRepository::new());
    repo.fail_next_create(Failure::Server);

    let (status, body) = send(app(&repo), post_json("/save", json!({"text": "Hi"}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn entries_are_returned_in_store_order() {
    let repo = Arc::new(ScriptedRepository::with_entries(5));
    let request = Request::builder()
        .uri("/entries?limit=3&sort=created_time")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&repo), request).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["title"], "Entry 0");
    assert_eq!(entries[2]["bodyText"], "Body 2");
    assert_eq!(entries[1]["fetchStatus"]["status"], "ok");
}

#[tokio::test]
async fn entries_query_failure_surfaces_status() {
    let repo = Arc::new(ScriptedRepository::with_entries(2));
    repo.fail_next_queries([Failure::BadRequest]);

    let request = Request::builder()
        .uri("/entries")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&repo), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("rejected"));
}

#[tokio::test]
async fn health_is_ok() {
    let repo = Arc::new(ScriptedRepository::new());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app(&repo).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

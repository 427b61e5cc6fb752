use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use rescope::{router, AppState, Faults};
use rescope_config::Settings;
use rescope_core::{CACHE_RESOURCE, MAIN_DB_RESOURCE};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

fn state() -> AppState {
    AppState::new(&Settings {
        latency: Duration::ZERO,
        ..Settings::default()
    })
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn user_route_queries_cache_and_database() {
    let (status, body) = send(state(), get("/user/123")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "user_id": 123,
            "cache": "[Cache] result: GET user:123",
            "database": "[MainDB] result: SELECT * FROM users WHERE id=123"
        })
    );
}

#[tokio::test]
async fn user_route_reports_unavailable_resource() {
    let state = state().with_faults(
        CACHE_RESOURCE,
        Faults {
            open: true,
            ..Faults::default()
        },
    );

    let (status, body) = send(state, get("/user/7")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"]["data"]["resource"], CACHE_RESOURCE);
    assert!(body["detail"]["msg"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn user_route_reports_body_failure() {
    let state = state().with_faults(
        MAIN_DB_RESOURCE,
        Faults {
            query: true,
            ..Faults::default()
        },
    );

    let (status, body) = send(state, get("/user/7")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]["msg"]
        .as_str()
        .unwrap()
        .contains("MainDB rejected query"));
    assert_eq!(body["detail"]["data"], json!({}));
}

#[tokio::test]
async fn user_route_reports_teardown_failure() {
    let state = state().with_faults(
        MAIN_DB_RESOURCE,
        Faults {
            close: true,
            ..Faults::default()
        },
    );

    let (status, body) = send(state, get("/user/7")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"]["data"]["resources"], json!([MAIN_DB_RESOURCE]));
}

#[tokio::test]
async fn user_route_rejects_non_numeric_id() {
    let (status, _) = send(state(), get("/user/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_route_greets_john() {
    let (status, body) = send(
        state(),
        post_json("/test", json!({ "name": "John", "age": 30 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "message": "Hello, John! You are 30 years old." })
    );
}

#[tokio::test]
async fn test_route_rejects_other_names() {
    let (status, body) = send(
        state(),
        post_json("/test", json!({ "name": "Jane", "age": 30 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "detail": { "msg": "Name must be John", "data": { "test": "test11111" } } })
    );
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/user/1")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = router(state()).oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

//! Handler tests for the users domain
//!
//! Drive the users router directly (no `/api` prefix, no docs UI) against the
//! in-memory repository and check status codes and envelope bodies.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> Router {
    handlers::router(UserService::new(InMemoryUserRepository::new()))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_create_get_and_duplicate_flow() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/", json!({"name": "Ada", "email": "ada@x.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/1");

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["result"]["id"], 1);
    assert!(body["result"]["createdOn"].is_string());

    let response = app.clone().oneshot(empty_request("GET", "/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["result"]["email"], "ada@x.com");

    let response = app
        .oneshot(json_request("POST", "/", json!({"name": "Bea", "email": "ADA@x.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_create_validation_error_returns_400() {
    let response = app()
        .oneshot(json_request("POST", "/", json!({"name": "A", "email": "not-an-email"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponseBody = json_body(response.into_body()).await;
    assert_eq!(body.error, "VALIDATION_ERROR");
    assert!(body.details.get("name").is_some());
    assert!(body.details.get("email").is_some());
}

#[derive(serde::Deserialize)]
struct ErrorResponseBody {
    error: String,
    details: Value,
}

#[tokio::test]
async fn test_create_blank_name_returns_400_and_stores_nothing() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/", json!({"name": "   ", "email": "ada@x.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponseBody = json_body(response.into_body()).await;
    let name_errors = body.details["name"].as_array().cloned().unwrap_or_default();
    assert!(name_errors.iter().any(|e| e["message"] == "Name is required"));

    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["result"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_create_malformed_json_returns_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_nonexistent_returns_404() {
    let response = app().oneshot(empty_request("GET", "/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User with ID 999 not found");
}

#[tokio::test]
async fn test_non_integer_id_returns_400() {
    let response = app().oneshot(empty_request("GET", "/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_returns_newest_first() {
    let app = app();
    for (name, email) in [("Ada", "ada@x.com"), ("Bea", "bea@x.com")] {
        app.clone()
            .oneshot(json_request("POST", "/", json!({"name": name, "email": email})))
            .await
            .unwrap();
    }

    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Retrieved 2 users successfully");
    let ids: Vec<i64> = body["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_update_flow() {
    let app = app();
    for (name, email) in [("Ada", "ada@x.com"), ("Bea", "bea@x.com")] {
        app.clone()
            .oneshot(json_request("POST", "/", json!({"name": name, "email": email})))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/1", json!({"name": "Ada King", "email": "ADA@x.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["result"]["name"], "Ada King");

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/2", json!({"name": "Bea", "email": "ada@X.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(json_request("PUT", "/42", json!({"name": "Nobody", "email": "n@x.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_get_returns_404() {
    let app = app();
    app.clone()
        .oneshot(json_request("POST", "/", json!({"name": "Ada", "email": "ada@x.com"})))
        .await
        .unwrap();

    let response = app.clone().oneshot(empty_request("DELETE", "/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["result"], true);
    assert_eq!(body["message"], "User deleted successfully");

    let response = app.clone().oneshot(empty_request("GET", "/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(empty_request("DELETE", "/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_location_header_uses_nested_path() {
    let app = Router::new().nest(
        "/api/users",
        handlers::router(UserService::new(InMemoryUserRepository::new())),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            json!({"name": "Ada", "email": "ada@x.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/api/users/1");
}

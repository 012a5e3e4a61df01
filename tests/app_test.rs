mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{setup, setup_with_config};
use serde_json::json;
use snaploop::config::AppConfig;

#[tokio::test]
async fn test_health() {
    let app = setup().await;
    let res = app.get("/health").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["database"], "connected");
    assert_eq!(res.body["mediaHost"], "unconfigured");
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let app = setup().await;
    let res = app.get("/api/nothing-here").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["error"], "Route not found");
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() {
    let app = setup().await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/users/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.request(req).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    assert!(res.body["error"].is_string());
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let app = setup_with_config(AppConfig {
        jwt_secret: "test_secret".to_string(),
        max_body_size: 1024,
        ..AppConfig::development()
    })
    .await;

    let res = app
        .send(
            "POST",
            "/api/users/register",
            Some(json!({
                "username": "maya",
                "displayName": "Maya",
                "email": "maya@example.com",
                "password": "x".repeat(4096),
            })),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["error"], "Request body is too large");
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup().await;
    let res = app.get("/health").await;

    assert_eq!(res.headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(res.headers[header::SERVER], "snaploop");
    assert!(res.headers.contains_key(header::CONTENT_SECURITY_POLICY));

    let trace = app
        .request(
            Request::builder()
                .method("TRACE")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(trace.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_allows_configured_origin_with_credentials() {
    let app = setup().await;
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/videos")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let res = app.request(req).await;

    assert_eq!(
        res.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(res.headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup().await;
    let res = app.get("/api-docs/openapi.json").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["paths"]["/api/videos/{id}/like"].is_object());
}

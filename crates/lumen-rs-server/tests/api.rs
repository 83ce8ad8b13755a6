//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use lumen_rs_core::{GenerationFailure, ImageGenerator};
use lumen_rs_server::{AppState, router};
use lumen_rs_test_utils::{FailingGenerator, RecordingGenerator};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app(generator: Arc<dyn ImageGenerator>) -> Router {
    router(AppState::new(generator))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header(header::CONTENT_TYPE, "application/json");
    }
    let request = request
        .body(body.map(|text| Body::from(text.to_string())).unwrap_or_else(Body::empty))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn generate_success_returns_url_and_id() {
    let generator = RecordingGenerator::succeeding("https://img.test/fox.png");
    let (status, json) = send(
        app(Arc::new(generator.clone())),
        Method::POST,
        "/api/generate",
        Some(r#"{"prompt": "a red fox, vintage", "style": "vintage", "systemPrompt": "Be vivid."}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], json!(true));
    assert_eq!(json["imageUrl"], json!("https://img.test/fox.png"));
    assert!(json["id"].as_str().expect("id").starts_with("img_"));

    let calls = generator.calls();
    assert_eq!(calls[0].prompt, "a red fox, vintage");
    assert_eq!(calls[0].system_prompt.as_deref(), Some("Be vivid."));
}

#[tokio::test]
async fn missing_prompt_is_bad_request() {
    let (status, json) = send(
        app(Arc::new(RecordingGenerator::succeeding("https://img.test/x.png"))),
        Method::POST,
        "/api/generate",
        Some(r#"{"style": "vintage"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], json!(false));
    assert_eq!(json["error"], json!("Prompt is required"));
    assert!(json["id"].as_str().expect("id").starts_with("error_"));
}

#[tokio::test]
async fn over_length_prompt_is_bad_request() {
    let generator = RecordingGenerator::succeeding("https://img.test/x.png");
    let body = json!({ "prompt": "a".repeat(1001) }).to_string();
    let (status, json) = send(
        app(Arc::new(generator.clone())),
        Method::POST,
        "/api/generate",
        Some(&body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], json!("Prompt is too long (max 1000 characters)"));
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn unreadable_body_is_bad_request() {
    let (status, json) = send(
        app(Arc::new(RecordingGenerator::succeeding("https://img.test/x.png"))),
        Method::POST,
        "/api/generate",
        Some("{ nope"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], json!(false));
}

#[tokio::test]
async fn generation_failure_is_server_error() {
    let generator = FailingGenerator::new(GenerationFailure::Api {
        status: 502,
        reason: "Bad Gateway".to_string(),
    });
    let (status, json) = send(
        app(Arc::new(generator)),
        Method::POST,
        "/api/generate",
        Some(r#"{"prompt": "a red fox"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], json!(false));
    assert_eq!(json["error"], json!("API Error: 502 - Bad Gateway"));
    assert!(json["id"].as_str().expect("id").starts_with("img_"));
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
        let (status, json) = send(
            app(Arc::new(FailingGenerator::no_image_url())),
            method,
            "/api/generate",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json, json!({ "error": "Method not allowed" }));
    }
}

#[tokio::test]
async fn styles_route_lists_catalog() {
    let (status, json) = send(
        app(Arc::new(FailingGenerator::no_image_url())),
        Method::GET,
        "/api/styles",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let styles = json.as_array().expect("array");
    assert_eq!(styles.len(), 8);
    assert_eq!(styles[0]["id"], json!("photorealistic"));
    assert!(styles[0]["promptModifier"].is_string());
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, json) = send(
        app(Arc::new(FailingGenerator::no_image_url())),
        Method::GET,
        "/health",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok" }));
}

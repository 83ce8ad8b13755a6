//! HTTP adapter tests against a local fake model endpoint.

use lumen_rs_config::ProviderConfig;
use lumen_rs_core::{GenerationFailure, HttpImageGenerator, ImageGenerator, UrlExtractor};
use lumen_rs_test_utils::{FakeModelServer, ModelReply};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn generator_for(server: &FakeModelServer) -> HttpImageGenerator {
    HttpImageGenerator::new(server.endpoint(), "test/model")
}

/// The first image URL in the reply becomes the result.
#[tokio::test]
async fn extracts_url_from_reply() {
    let server = FakeModelServer::spawn(ModelReply::Content(
        "Your image: https://cdn.test/out/fox.png (enjoy)".to_string(),
    ))
    .await;
    let response = generator_for(&server).generate("a fox", None).await;

    assert_eq!(response.result, Ok("https://cdn.test/out/fox.png".to_string()));
    assert!(response.id.starts_with("img_"));
}

/// Body and headers follow the chat-completions shape.
#[tokio::test]
async fn sends_single_user_message_with_headers() {
    let server =
        FakeModelServer::spawn(ModelReply::Content("https://cdn.test/a.jpg".to_string())).await;
    let config = ProviderConfig {
        endpoint: server.endpoint().to_string(),
        model: "test/model".to_string(),
        api_key: Some("secret".to_string()),
        customer_id: Some("cus_1".to_string()),
    };
    HttpImageGenerator::from_config(&config)
        .generate("a fox", Some("Be vivid."))
        .await;

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer secret"));
    assert_eq!(requests[0].customer_id.as_deref(), Some("cus_1"));
    assert_eq!(
        requests[0].body,
        json!({
            "model": "test/model",
            "messages": [{"role": "user", "content": "Be vivid.\n\na fox"}]
        })
    );
}

/// Non-success statuses map to `API Error: <code> - <reason>`.
#[tokio::test]
async fn non_success_status_is_api_error() {
    let server = FakeModelServer::spawn(ModelReply::Status(503)).await;
    let response = generator_for(&server).generate("a fox", None).await;

    let failure = response.result.expect_err("api error");
    assert_eq!(
        failure,
        GenerationFailure::Api {
            status: 503,
            reason: "Service Unavailable".to_string()
        }
    );
    assert_eq!(failure.to_string(), "API Error: 503 - Service Unavailable");
}

/// Replies without an image URL fail with the fixed message.
#[tokio::test]
async fn reply_without_url_fails() {
    let server =
        FakeModelServer::spawn(ModelReply::Content("I cannot draw that.".to_string())).await;
    let response = generator_for(&server).generate("a fox", None).await;

    let failure = response.result.expect_err("no url");
    assert_eq!(failure.to_string(), "No image URL found in response");
}

/// Missing `choices` is treated like an empty reply.
#[tokio::test]
async fn reply_without_choices_fails() {
    let server = FakeModelServer::spawn(ModelReply::Raw("{}".to_string())).await;
    let response = generator_for(&server).generate("a fox", None).await;
    assert_eq!(response.result, Err(GenerationFailure::NoImageUrl));
}

/// Undecodable bodies become transport failures instead of panics.
#[tokio::test]
async fn undecodable_body_is_transport_failure() {
    let server = FakeModelServer::spawn(ModelReply::Raw("not json".to_string())).await;
    let response = generator_for(&server).generate("a fox", None).await;
    assert!(matches!(
        response.result,
        Err(GenerationFailure::Transport(_))
    ));
}

/// Unreachable endpoints fail without raising.
#[tokio::test]
async fn unreachable_endpoint_is_transport_failure() {
    let generator = HttpImageGenerator::new("http://127.0.0.1:9/chat/completions", "m");
    let response = generator.generate("a fox", None).await;
    assert!(matches!(
        response.result,
        Err(GenerationFailure::Transport(_))
    ));
    assert!(!generator.test_connection().await);
}

/// Each call mints a new id.
#[tokio::test]
async fn ids_are_fresh_per_call() {
    let server = FakeModelServer::spawn(ModelReply::Status(500)).await;
    let generator = generator_for(&server);
    let first = generator.generate("a", None).await;
    let second = generator.generate("a", None).await;
    assert_ne!(first.id, second.id);
}

/// Connection test reports the endpoint status.
#[tokio::test]
async fn connection_test_follows_status() {
    let ok = FakeModelServer::spawn(ModelReply::Content("pong".to_string())).await;
    assert!(generator_for(&ok).test_connection().await);
    assert_eq!(
        ok.requests()[0].body["messages"][0]["content"],
        json!("Test connection")
    );

    let down = FakeModelServer::spawn(ModelReply::Status(401)).await;
    assert!(!generator_for(&down).test_connection().await);
}

struct AnyHttps;

impl UrlExtractor for AnyHttps {
    fn extract(&self, text: &str) -> Option<String> {
        text.split_whitespace()
            .find(|word| word.starts_with("https://"))
            .map(str::to_string)
    }
}

/// A custom extractor replaces the default pattern.
#[tokio::test]
async fn custom_extractor_is_used() {
    let server = FakeModelServer::spawn(ModelReply::Content(
        "see https://cdn.test/render?id=7".to_string(),
    ))
    .await;
    let response = generator_for(&server)
        .with_extractor(Arc::new(AnyHttps))
        .generate("a fox", None)
        .await;
    assert_eq!(
        response.result,
        Ok("https://cdn.test/render?id=7".to_string())
    );
}

//! Throwaway chat-completions endpoint and image host for tests.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Body served for every image under `/images/`.
pub const FAKE_IMAGE_BYTES: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg";

/// What the fake endpoint answers with.
#[derive(Debug, Clone)]
pub enum ModelReply {
    /// `200` with `choices[0].message.content` set to the text.
    Content(String),
    /// Bare status code with a plain-text body.
    Status(u16),
    /// `200` with an arbitrary JSON-typed body.
    Raw(String),
}

/// One request received by the fake endpoint.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub customer_id: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeState {
    reply: ModelReply,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Local HTTP server bound to `127.0.0.1:0`, aborted on drop.
pub struct FakeModelServer {
    base: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: JoinHandle<()>,
}

impl FakeModelServer {
    pub async fn spawn(reply: ModelReply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            reply,
            requests: requests.clone(),
        };
        let app = Router::new()
            .route("/chat/completions", post(chat_completions))
            .route("/images/{name}", get(image))
            .with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake model server");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve fake model");
        });
        Self {
            base: format!("http://{addr}"),
            requests,
            handle,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base)
    }

    /// URL of a hosted image; names starting with `missing` answer 404.
    pub fn image_url(&self, name: &str) -> String {
        format!("{}/images/{name}", self.base)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().clone()
    }
}

impl Drop for FakeModelServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn chat_completions(
    State(state): State<FakeState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().push(CapturedRequest {
        authorization: header_value(header::AUTHORIZATION.as_str()),
        customer_id: header_value("customerId"),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });

    match state.reply {
        ModelReply::Content(text) => axum::Json(json!({
            "choices": [{"message": {"role": "assistant", "content": text}}]
        }))
        .into_response(),
        ModelReply::Status(code) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "upstream failure",
        )
            .into_response(),
        ModelReply::Raw(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
    }
}

async fn image(Path(name): Path<String>) -> Response {
    if name.starts_with("missing") {
        return StatusCode::NOT_FOUND.into_response();
    }
    ([(header::CONTENT_TYPE, "image/jpeg")], FAKE_IMAGE_BYTES).into_response()
}

//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lumen_rs_protocol::GenerateResponse;
use serde_json::json;

/// Handler errors, rendered as the `{success: false, error, id}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unreadable body or rejected prompt.
    #[error("{message}")]
    BadRequest { id: String, message: String },
    /// The model call did not produce an image.
    #[error("{message}")]
    Generation { id: String, message: String },
    /// Unsupported method on a known path.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest { id, message } => (
                StatusCode::BAD_REQUEST,
                Json(GenerateResponse::failure(id, message)),
            )
                .into_response(),
            ApiError::Generation { id, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GenerateResponse::failure(id, message)),
            )
                .into_response(),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "error": "Method not allowed" })),
            )
                .into_response(),
        }
    }
}

/// Errors starting or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

//! Route handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use log::{debug, info, warn};
use lumen_rs_core::{StylePreset, styles, validate_prompt};
use lumen_rs_protocol::{GenerateRequest, GenerateResponse, now_millis};
use serde_json::{Value, json};

/// Id attached to responses for requests that never reached the model.
fn rejection_id() -> String {
    format!("error_{}", now_millis())
}

/// `POST /api/generate`: forward a final prompt to the model.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("rejected generate body (reason={})", rejection.body_text());
        ApiError::BadRequest {
            id: rejection_id(),
            message: "Invalid request body".to_string(),
        }
    })?;

    validate_prompt(&request.prompt, state.max_prompt_chars).map_err(|err| {
        ApiError::BadRequest {
            id: rejection_id(),
            message: err.to_string(),
        }
    })?;

    info!(
        "generate request (style={}, prompt_len={})",
        request.style.as_deref().unwrap_or("none"),
        request.prompt.len()
    );
    let system_prompt = request
        .system_prompt
        .as_deref()
        .filter(|prompt| !prompt.is_empty());
    let response = state
        .generator
        .generate(&request.prompt, system_prompt)
        .await;

    match response.result {
        Ok(url) => Ok(Json(GenerateResponse::success(response.id, url))),
        Err(failure) => {
            warn!("generate request failed (id={}, error={failure})", response.id);
            Err(ApiError::Generation {
                id: response.id,
                message: failure.to_string(),
            })
        }
    }
}

/// `GET /api/styles`: the style catalog in order.
pub async fn list_styles() -> Json<&'static [StylePreset]> {
    Json(styles::list_all())
}

/// `GET /health`.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Any other method on `/api/generate`.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

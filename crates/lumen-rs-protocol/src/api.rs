//! Request and response bodies for the generate endpoint.

use serde::{Deserialize, Serialize};

/// Body accepted by `POST /api/generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Prompt forwarded to the model (required, bounded length).
    #[serde(default)]
    pub prompt: String,
    /// Optional style identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Optional instruction text prepended to the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// Body returned by `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub id: String,
}

impl GenerateResponse {
    /// Successful generation carrying the image URL.
    pub fn success(id: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            success: true,
            image_url: Some(image_url.into()),
            error: None,
            id: id.into(),
        }
    }

    /// Failed generation carrying the reason.
    pub fn failure(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            image_url: None,
            error: Some(error.into()),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GenerateRequest, GenerateResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_reads_camel_case_fields() {
        let request: GenerateRequest = serde_json::from_value(json!({
            "prompt": "a red fox",
            "systemPrompt": "be bold"
        }))
        .expect("request");
        assert_eq!(request.system_prompt.as_deref(), Some("be bold"));
        assert_eq!(request.style, None);
    }

    #[test]
    fn success_response_omits_error() {
        let value = serde_json::to_value(GenerateResponse::success("img_1", "https://x/a.png"))
            .expect("json");
        assert_eq!(
            value,
            json!({ "success": true, "imageUrl": "https://x/a.png", "id": "img_1" })
        );
    }
}

//! Chat-completions style HTTP backend.

use super::{
    CONNECTION_TEST_PROMPT, GenerationResponse, ImageGenerator, RegexUrlExtractor, UrlExtractor,
    build_message, mint_generation_id,
};
use crate::error::GenerationFailure;
use async_trait::async_trait;
use log::{debug, warn};
use lumen_rs_config::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body: one user message for a fixed model.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}

/// Sends prompts to a chat-completions endpoint and scrapes the reply for an image URL.
#[derive(Clone)]
pub struct HttpImageGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    customer_id: Option<String>,
    extractor: Arc<dyn UrlExtractor>,
}

impl std::fmt::Debug for HttpImageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageGenerator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("customer_id", &self.customer_id)
            .finish_non_exhaustive()
    }
}

impl HttpImageGenerator {
    /// Create a generator for `model` served at `endpoint`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            customer_id: None,
            extractor: Arc::new(RegexUrlExtractor::default()),
        }
    }

    /// Create a generator from the provider config block.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut generator = Self::new(config.endpoint.clone(), config.model.clone());
        generator.api_key = config.api_key.clone();
        generator.customer_id = config.customer_id.clone();
        generator
    }

    /// Replace the URL extraction strategy.
    pub fn with_extractor(mut self, extractor: Arc<dyn UrlExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, content: &str) -> Result<reqwest::Response, reqwest::Error> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content,
            }],
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }
        if let Some(customer_id) = &self.customer_id {
            request = request.header("customerId", customer_id);
        }
        request.send().await
    }

    async fn request_image(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, GenerationFailure> {
        let content = build_message(prompt, system_prompt);
        debug!(
            "sending generation request (model={}, content_len={})",
            self.model,
            content.len()
        );
        let response = self
            .send(&content)
            .await
            .map_err(|err| GenerationFailure::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "generation endpoint returned error (status={}, body_len={})",
                status.as_u16(),
                body.len()
            );
            return Err(GenerationFailure::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|err| GenerationFailure::Transport(err.to_string()))?;
        let content = reply.into_first_content().unwrap_or_default();
        self.extractor.extract(&content).ok_or_else(|| {
            warn!(
                "no image url in generation response (content_len={})",
                content.len()
            );
            GenerationFailure::NoImageUrl
        })
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> GenerationResponse {
        let id = mint_generation_id();
        match self.request_image(prompt, system_prompt).await {
            Ok(url) => {
                debug!("generation succeeded (id={id})");
                GenerationResponse::success(id, url)
            }
            Err(failure) => GenerationResponse::failure(id, failure),
        }
    }

    async fn test_connection(&self) -> bool {
        match self.send(CONNECTION_TEST_PROMPT).await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!("connection test failed (endpoint={}, error={err})", self.endpoint);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, ChatRequest, ChatResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_body_has_single_user_message() {
        let body = ChatRequest {
            model: "m",
            messages: [ChatMessage {
                role: "user",
                content: "hello",
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).expect("serialize"),
            json!({"model": "m", "messages": [{"role": "user", "content": "hello"}]})
        );
    }

    #[test]
    fn missing_choices_yield_no_content() {
        let reply: ChatResponse = serde_json::from_value(json!({})).expect("decode");
        assert_eq!(reply.into_first_content(), None);

        let reply: ChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]}))
                .expect("decode");
        assert_eq!(reply.into_first_content(), None);
    }
}

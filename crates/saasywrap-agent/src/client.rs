// ABOUTME: Chat-model client abstraction and its OpenAI Chat Completions adapter.
// ABOUTME: Requests ask for n completions in JSON mode; responses come back as raw choice strings.

use async_trait::async_trait;
use serde_json::{Value, json};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Errors that can occur while talking to a hosted model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,
}

/// A single completion request. `choices` is the number of alternative
/// completions to ask for; callers scan them for the first valid one.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub choices: u8,
    /// Whether to request the provider's JSON-object response format.
    pub json_mode: bool,
}

impl ChatRequest {
    /// A JSON-mode request with a single choice.
    pub fn json(system: &str, user: &str) -> Self {
        Self {
            system: system.to_string(),
            user: user.to_string(),
            choices: 1,
            json_mode: true,
        }
    }

    /// A plain-text request with no system prompt (used for the clarifying
    /// question probe, which expects free text back).
    pub fn text(user: &str) -> Self {
        Self {
            system: String::new(),
            user: user.to_string(),
            choices: 1,
            json_mode: false,
        }
    }

    pub fn with_choices(mut self, choices: u8) -> Self {
        self.choices = choices.max(1);
        self
    }
}

/// Trait implemented by every chat-model backend. The OpenAI adapter is the
/// production implementation; tests use [`crate::testing::StubModel`].
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Request completions and return the content string of every choice,
    /// in choice order.
    async fn complete(&self, request: &ChatRequest) -> Result<Vec<String>, ModelError>;

    /// Model identifier for logging and display (e.g. "gpt-4o-mini").
    fn model_name(&self) -> &str;
}

/// OpenAI adapter over the Chat Completions API.
pub struct OpenAiModel {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiModel {
    /// Create a new OpenAiModel reading configuration from environment variables.
    /// Required: `OPENAI_API_KEY`
    /// Optional: `OPENAI_BASE_URL` (defaults to https://api.openai.com)
    /// Optional: `OPENAI_MODEL` (defaults to gpt-4o-mini)
    pub fn from_env() -> Result<Self, ModelError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ModelError::Provider("OPENAI_API_KEY not set".to_string()))?;

        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, base_url, model))
    }

    /// Create a new OpenAiModel with explicit configuration.
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Build the JSON request body for the Chat Completions API.
    pub fn build_request_body(&self, request: &ChatRequest) -> Value {
        let mut messages = Vec::new();

        if !request.system.is_empty() {
            messages.push(json!({
                "role": "system",
                "content": request.system
            }));
        }

        messages.push(json!({
            "role": "user",
            "content": request.user
        }));

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "n": request.choices
        });

        if request.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        body
    }

    /// Extract the content strings from a Chat Completions response body.
    pub fn parse_choices(response_body: &Value) -> Result<Vec<String>, ModelError> {
        let choices = response_body
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                ModelError::InvalidResponse("missing choices array in response".to_string())
            })?;

        if choices.is_empty() {
            return Err(ModelError::InvalidResponse("empty choices array".to_string()));
        }

        let mut contents = Vec::with_capacity(choices.len());
        for choice in choices {
            let content = choice
                .get("message")
                .and_then(|m| m.get("content"))
                .and_then(|c| c.as_str())
                .unwrap_or("");
            contents.push(content.to_string());
        }

        Ok(contents)
    }
}

#[async_trait]
impl ChatModel for OpenAiModel {
    async fn complete(&self, request: &ChatRequest) -> Result<Vec<String>, ModelError> {
        let body = self.build_request_body(request);
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Provider(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ModelError::RateLimited);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ModelError::Provider(
                "Unauthorized: check OPENAI_API_KEY".to_string(),
            ));
        }

        if status.is_server_error() {
            return Err(ModelError::Provider(format!("Server error: {}", status)));
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ModelError::Provider(format!(
                "API error {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("failed to parse JSON: {}", e)))?;

        Self::parse_choices(&response_body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_model_creation() {
        let model = OpenAiModel::new(
            "test-key".to_string(),
            "https://api.openai.com".to_string(),
            "gpt-4o-mini".to_string(),
        );

        assert_eq!(model.model_name(), "gpt-4o-mini");
        assert_eq!(model.api_key, "test-key");
        assert_eq!(model.base_url, "https://api.openai.com");
    }

    #[test]
    fn builds_json_mode_body_with_choice_count() {
        let model = OpenAiModel::new(
            "test-key".to_string(),
            "https://api.openai.com".to_string(),
            "gpt-4o-mini".to_string(),
        );

        let request = ChatRequest::json("You are a requirements analyst.", "Describe the app.")
            .with_choices(3);
        let body = model.build_request_body(&request);

        assert_eq!(body.get("model").and_then(|m| m.as_str()), Some("gpt-4o-mini"));
        assert_eq!(body.get("n").and_then(|n| n.as_u64()), Some(3));
        assert_eq!(
            body["response_format"]["type"].as_str(),
            Some("json_object")
        );

        let messages = body.get("messages").and_then(|m| m.as_array()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
    }

    #[test]
    fn text_request_omits_system_and_format() {
        let model = OpenAiModel::new(
            "test-key".to_string(),
            "https://api.openai.com".to_string(),
            "gpt-4o-mini".to_string(),
        );

        let body = model.build_request_body(&ChatRequest::text("Any clarifying questions?"));

        assert!(body.get("response_format").is_none());
        let messages = body.get("messages").and_then(|m| m.as_array()).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }

    #[test]
    fn with_choices_floors_at_one() {
        let request = ChatRequest::json("s", "u").with_choices(0);
        assert_eq!(request.choices, 1);
    }

    #[test]
    fn parses_all_choice_contents() {
        let response = json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": "{\"response\": \"first\"}" },
                    "finish_reason": "stop"
                },
                {
                    "index": 1,
                    "message": { "role": "assistant", "content": "{\"response\": \"second\"}" },
                    "finish_reason": "stop"
                }
            ]
        });

        let choices = OpenAiModel::parse_choices(&response).unwrap();
        assert_eq!(choices.len(), 2);
        assert!(choices[0].contains("first"));
        assert!(choices[1].contains("second"));
    }

    #[test]
    fn parse_rejects_missing_choices() {
        let response = json!({ "id": "chatcmpl-456", "object": "chat.completion" });
        let err = OpenAiModel::parse_choices(&response).unwrap_err();
        assert!(err.to_string().contains("missing choices"));
    }

    #[test]
    fn parse_rejects_empty_choices() {
        let response = json!({ "choices": [] });
        let err = OpenAiModel::parse_choices(&response).unwrap_err();
        assert!(err.to_string().contains("empty choices"));
    }

    #[test]
    fn null_content_becomes_empty_string() {
        let response = json!({
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": null },
                    "finish_reason": "stop"
                }
            ]
        });

        let choices = OpenAiModel::parse_choices(&response).unwrap();
        assert_eq!(choices, vec![String::new()]);
    }
}

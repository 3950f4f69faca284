//! Completion transport. One configured client instance is shared by the
//! intent parser and the response synthesizer; endpoint, model, and
//! credentials are injected once at construction time.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use rolodex_core::config::LlmConfig;
use rolodex_core::LlmError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Abstract completion contract: ordered messages in, one text completion
/// out. `json_only` asks the endpoint to constrain output to a JSON
/// object. No retries at this layer.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], json_only: bool)
        -> Result<String, LlmError>;
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiCompatClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| LlmError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.as_ref().map(|key| key.expose_secret().to_string()),
        })
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        json_only: bool,
    ) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            response_format: json_only.then(|| json!({"type": "json_object"})),
        };

        let mut request =
            self.client.post(format!("{}/chat/completions", self.base_url)).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response =
            request.send().await.map_err(|err| LlmError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { code: status.as_u16(), detail });
        }

        let completion = response
            .json::<CompletionResponse>()
            .await
            .map_err(|err| LlmError::Decode(err.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        debug!(chars = content.len(), json_only, "llm completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ChatMessage, CompletionRequest, CompletionResponse};

    #[test]
    fn request_encodes_messages_with_lowercase_roles() {
        let messages =
            [ChatMessage::system("You are a parser."), ChatMessage::user("Find Asha")];
        let body = CompletionRequest {
            model: "llama3.1",
            messages: &messages,
            response_format: Some(json!({"type": "json_object"})),
        };

        let encoded = serde_json::to_value(&body).expect("request should encode");
        assert_eq!(encoded["model"], "llama3.1");
        assert_eq!(encoded["messages"][0]["role"], "system");
        assert_eq!(encoded["messages"][1]["role"], "user");
        assert_eq!(encoded["response_format"]["type"], "json_object");
    }

    #[test]
    fn request_omits_response_format_when_unconstrained() {
        let messages = [ChatMessage::user("hello")];
        let body =
            CompletionRequest { model: "llama3.1", messages: &messages, response_format: None };

        let encoded = serde_json::to_value(&body).expect("request should encode");
        assert!(encoded.get("response_format").is_none());
    }

    #[test]
    fn response_decodes_first_choice_content() {
        let raw = r#"{
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hi there"}}
            ],
            "usage": {"total_tokens": 5}
        }"#;

        let decoded: CompletionResponse = serde_json::from_str(raw).expect("should decode");
        assert_eq!(decoded.choices[0].message.content.as_deref(), Some("hi there"));
    }

    #[test]
    fn response_tolerates_missing_choices() {
        let decoded: CompletionResponse = serde_json::from_str("{}").expect("should decode");
        assert!(decoded.choices.is_empty());
    }
}

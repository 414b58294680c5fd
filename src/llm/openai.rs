use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use tracing::debug;

use super::provider::{ChatMessage, CompletionOptions, GenerationBackend, LlmError};
use crate::config::BackendConfig;

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiCompatibleBackend {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiCompatibleBackend {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into(),
            model: model.into(),
        }
    }

    /// `None` when the configured API key variable is unset or blank.
    pub fn from_config(config: &BackendConfig) -> Option<Self> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())?;
        Some(Self::new(api_key, config.api_base.clone(), config.model.clone()))
    }
}

#[async_trait]
impl GenerationBackend for OpenAiCompatibleBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete_json(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Value, LlmError> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            response_format: ResponseFormat { kind: "json_object" },
        };

        debug!(model = %self.model, message_count = messages.len(), "sending completion request");

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Connection(err.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| LlmError::InvalidResponse(format!("response parse failed: {}", err)))?;

        let content = body
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .ok_or_else(|| LlmError::InvalidResponse("response missing choices".to_string()))?;

        parse_json_object(content)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// Parse the reply as a JSON object, tolerating prose around the braces.
pub fn parse_json_object(content: &str) -> Result<Value, LlmError> {
    let json = extract_json(content)
        .ok_or_else(|| LlmError::InvalidResponse("response missing JSON".to_string()))?;
    let value: Value = serde_json::from_str(json)
        .map_err(|err| LlmError::Serialization(format!("JSON parse failed: {}", err)))?;
    if !value.is_object() {
        return Err(LlmError::InvalidResponse("response is not a JSON object".to_string()));
    }
    Ok(value)
}

fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(&text[start..=end])
}

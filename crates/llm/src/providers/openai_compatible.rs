//! OpenAI-compatible chat completions provider.
//!
//! Works with any service exposing `POST {endpoint}/chat/completions`
//! (DeepSeek, OpenAI and most hosted gateways).

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::error::LlmError;
use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Client for OpenAI-compatible chat completion APIs.
pub struct ChatCompletionsClient {
    provider: String,

    /// Base URLs, tried in order
    endpoints: Vec<String>,

    api_key: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    /// Create a client. `endpoints` must not be empty.
    pub fn new(
        provider: impl Into<String>,
        endpoints: Vec<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        if endpoints.is_empty() {
            return Err(LlmError::Transport("no endpoints configured".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::from_reqwest)?;
        Ok(Self {
            provider: provider.into(),
            endpoints: endpoints
                .into_iter()
                .map(|e| e.trim_end_matches('/').to_string())
                .collect(),
            api_key,
            client,
        })
    }

    async fn complete_at(
        &self,
        endpoint: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/chat/completions", endpoint);
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(LlmError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(LlmError::from_reqwest)?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("response has no choices".to_string()))?;

        let usage = parsed
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(LlmResponse {
            content: content.trim().to_string(),
            model: parsed.model.unwrap_or_else(|| request.model.clone()),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for ChatCompletionsClient {
    fn provider_name(&self) -> &str {
        &self.provider
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        tracing::info!("Sending chat completion request to {}", self.provider);
        tracing::debug!(
            "Request: model={} messages={} max_tokens={:?}",
            request.model,
            request.messages.len(),
            request.max_tokens
        );

        let mut last_error = None;
        for endpoint in &self.endpoints {
            match self.complete_at(endpoint, request).await {
                Ok(response) => {
                    tracing::info!(
                        "Token usage ({}): prompt={} completion={} total={}",
                        self.provider,
                        response.usage.prompt_tokens,
                        response.usage.completion_tokens,
                        response.usage.total_tokens
                    );
                    return Ok(response);
                }
                Err(err @ LlmError::MalformedResponse(_)) => return Err(err),
                Err(err) => {
                    tracing::warn!("Endpoint {} failed: {}", endpoint, err);
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Transport("no endpoints configured".to_string())))
    }
}

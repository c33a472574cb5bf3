//! LLM provider factory.
//!
//! Builds a client for a provider name from the resolved configuration
//! values (endpoints, API key, timeout).

use crate::client::LlmClient;
use crate::error::LlmError;
use crate::providers::ollama::DEFAULT_OLLAMA_URL;
use crate::providers::{ChatCompletionsClient, OllamaClient};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("deepseek", "openai", "ollama")
/// * `endpoints` - Base URLs to try in order; the first is used for Ollama
/// * `api_key` - API key, required by hosted providers
/// * `timeout` - Per-request timeout
///
/// # Errors
/// Returns error if the provider is unknown, a required key is missing,
/// or no endpoint is configured.
pub fn create_client(
    provider: &str,
    endpoints: Vec<String>,
    api_key: Option<String>,
    timeout: Duration,
) -> Result<Arc<dyn LlmClient>, String> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoints
                .into_iter()
                .next()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            let client = OllamaClient::with_base_url(base_url, timeout).map_err(describe)?;
            Ok(Arc::new(client))
        }
        name @ ("deepseek" | "openai") => {
            if api_key.is_none() {
                return Err(format!("{} provider requires API key", name));
            }
            let client =
                ChatCompletionsClient::new(name, endpoints, api_key, timeout).map_err(describe)?;
            Ok(Arc::new(client))
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}

fn describe(err: LlmError) -> String {
    format!("Failed to create client: {}", err)
}

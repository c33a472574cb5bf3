//! Generation service clients for Intexta.
//!
//! This crate provides a provider-agnostic abstraction over chat
//! completion services through a single trait, [`LlmClient`].
//!
//! # Providers
//! - **OpenAI-compatible** (`deepseek` by default, `openai`): `POST /chat/completions`
//! - **Ollama**: local runtime, `POST /api/chat`
//!
//! # Example
//! ```no_run
//! use intexta_llm::{ChatMessage, LlmClient, LlmRequest, providers::OllamaClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::with_base_url("http://localhost:11434", Duration::from_secs(40))?;
//! let request = LlmRequest::new("llama3.2", vec![ChatMessage::user("Hola")]);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use error::LlmError;
pub use factory::create_client;
pub use providers::{ChatCompletionsClient, OllamaClient};
pub use types::{ChatMessage, Role};

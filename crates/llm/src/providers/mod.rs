pub mod ollama;
pub mod openai_compatible;

pub use ollama::OllamaClient;
pub use openai_compatible::ChatCompletionsClient;

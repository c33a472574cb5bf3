//! Ask command handler.
//!
//! Answers one question through the document or inventory assistant.

use clap::Args;
use intexta_assistant::{
    DocumentAssistant, InMemorySessionStore, InventoryAssistant, PromptTemplates, Reply, Responder,
};
use intexta_context::{Assembler, Budget, DirectoryCorpus};
use intexta_core::{config::AppConfig, AppError, AppResult};
use intexta_filter::{loader_for, DatasetCache};
use intexta_llm::create_client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Answer a question from documents or an inventory
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Answer from this directory of documents
    #[arg(long, conflicts_with = "csv")]
    pub docs: Option<PathBuf>,

    /// Answer from this CSV path or URL (default: dataset.source)
    #[arg(long)]
    pub csv: Option<String>,

    /// Conversation identifier
    #[arg(short, long, default_value = "cli")]
    pub user: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let llm = create_client(
            &config.provider,
            config.provider_endpoints(),
            config.resolve_api_key(&config.provider),
            Duration::from_secs(config.provider_timeout_secs()),
        )
        .map_err(AppError::Config)?;

        let prompts = PromptTemplates::load(&config.intexta_dir().join("prompts.yml"))?;
        let responder = Responder::new(
            llm,
            Arc::new(InMemorySessionStore::new()),
            &config.model,
            config.dataset.history_turns,
        );

        let reply = if let Some(ref docs) = self.docs {
            let assistant = DocumentAssistant::new(
                Arc::new(DirectoryCorpus::new(docs)),
                Assembler::new(Budget::from(&config.retrieval)),
                responder,
                prompts,
            );
            assistant.reply(&self.user, &self.question).await
        } else {
            let source = self
                .csv
                .clone()
                .or_else(|| config.dataset.source.clone())
                .ok_or_else(|| {
                    AppError::Config(
                        "Nothing to answer from. Use --docs, --csv or set dataset.source"
                            .to_string(),
                    )
                })?;
            let dataset = Arc::new(DatasetCache::new(loader_for(&source)?));
            let assistant = InventoryAssistant::new(dataset, responder, prompts)
                .with_max_context_chars(config.dataset.max_context_chars);
            assistant.reply(&self.user, &self.question).await
        };

        self.print(&reply, config)
    }

    fn print(&self, reply: &Reply, config: &AppConfig) -> AppResult<()> {
        if self.json {
            let output = serde_json::json!({
                "answer": reply.text,
                "kind": reply.kind,
                "model": config.model,
                "provider": config.provider,
                "contextChars": reply.context_chars,
                "usage": reply.usage,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", reply.text);

            if let Some(usage) = reply.usage {
                tracing::debug!(
                    "Token usage - Prompt: {}, Completion: {}, Total: {}",
                    usage.prompt_tokens,
                    usage.completion_tokens,
                    usage.total_tokens
                );
            }
        }

        Ok(())
    }
}

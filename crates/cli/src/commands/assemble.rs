//! Assemble command handler.
//!
//! Prints the bounded context a question would be answered from.

use clap::Args;
use intexta_context::{Assembler, Budget, DirectoryCorpus};
use intexta_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Assemble bounded context from a directory of documents
#[derive(Args, Debug)]
pub struct AssembleCommand {
    /// Directory of .txt/.md documents
    #[arg(long)]
    pub docs: PathBuf,

    /// Query used to rank paragraphs
    #[arg(short, long)]
    pub query: Option<String>,

    /// Character budget (default: retrieval.contextBudget)
    #[arg(long)]
    pub budget: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AssembleCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing assemble command");
        tracing::debug!("Assemble command options: {:?}", self);

        let documents = DirectoryCorpus::new(&self.docs).load_all().await?;
        tracing::info!("Loaded {} document(s) from {:?}", documents.len(), self.docs);

        let mut budget = Budget::from(&config.retrieval);
        if let Some(total) = self.budget {
            budget.total = total;
        }

        let assembled = Assembler::new(budget).assemble(&documents, self.query.as_deref());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&assembled)?);
        } else {
            println!("{}", assembled.text);
            tracing::debug!(
                "Assembled {} chars from {} document(s), {} omitted",
                assembled.char_len(),
                assembled.documents.len(),
                assembled.omitted
            );
        }

        Ok(())
    }
}

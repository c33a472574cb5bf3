//! Question answering over a user's documents.

use crate::prompts::{render_template, PromptTemplates};
use crate::replies::{self, Command};
use crate::reply::{Reply, ReplyKind};
use crate::responder::{Generation, Responder};
use intexta_context::{Assembler, CorpusProvider};
use std::sync::Arc;

/// Sampling for document answers.
pub const DOCUMENT_GENERATION: Generation = Generation {
    max_tokens: 500,
    temperature: 0.7,
};

/// Answers questions from the documents a corpus provider returns for
/// each user.
pub struct DocumentAssistant {
    corpus: Arc<dyn CorpusProvider>,
    assembler: Assembler,
    responder: Responder,
    prompts: PromptTemplates,
}

impl DocumentAssistant {
    pub fn new(
        corpus: Arc<dyn CorpusProvider>,
        assembler: Assembler,
        responder: Responder,
        prompts: PromptTemplates,
    ) -> Self {
        Self {
            corpus,
            assembler,
            responder,
            prompts,
        }
    }

    pub async fn reply(&self, user: &str, message: &str) -> Reply {
        match Command::parse(message) {
            Some(Command::Help) => return Reply::fixed(replies::HELP, ReplyKind::Command),
            Some(Command::Reset) => {
                self.responder.reset(user);
                return Reply::fixed(replies::RESET, ReplyKind::Command);
            }
            None => {}
        }

        let documents = match self.corpus.documents(user).await {
            Ok(documents) => documents,
            Err(e) => {
                tracing::warn!("Could not load documents for {}: {}", user, e);
                Vec::new()
            }
        };
        if documents.is_empty() {
            tracing::info!("No documents for {}", user);
            return Reply::fixed(replies::NO_DOCUMENTS, ReplyKind::NoData);
        }

        let assembled = self.assembler.assemble(&documents, Some(message));
        let context = match render_template(
            &self.prompts.document_context,
            &serde_json::json!({ "context": assembled.text }),
        ) {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!("Falling back to raw context: {}", e);
                assembled.text
            }
        };

        self.responder
            .respond(
                user,
                self.prompts.document_system.clone(),
                context,
                message.trim(),
                DOCUMENT_GENERATION,
            )
            .await
    }
}

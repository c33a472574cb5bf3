//! Question answering over an inventory dataset.

use crate::prompts::{render_template, PromptTemplates};
use crate::replies::{self, Command};
use crate::reply::{Reply, ReplyKind};
use crate::responder::{Generation, Responder};
use intexta_core::text::truncate_chars;
use intexta_filter::schema::columns;
use intexta_filter::{location_summary, render_rows, DatasetCache, QueryFilter};
use std::sync::Arc;

/// Sampling for inventory answers.
pub const INVENTORY_GENERATION: Generation = Generation {
    max_tokens: 256,
    temperature: 0.2,
};

/// Default cap on the rendered context.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 12_000;

/// Filtered rows included in the context.
pub const RESULT_ROWS: usize = 40;

const RESULT_COLUMNS: &[&str] = &[
    columns::SKU,
    columns::BRAND,
    columns::NAME,
    columns::LOCATION,
    columns::FEATURES,
    columns::PRICE,
];

/// Answers questions about the dataset held by a [`DatasetCache`].
pub struct InventoryAssistant {
    dataset: Arc<DatasetCache>,
    filter: QueryFilter,
    responder: Responder,
    prompts: PromptTemplates,
    max_context_chars: usize,
}

impl InventoryAssistant {
    pub fn new(dataset: Arc<DatasetCache>, responder: Responder, prompts: PromptTemplates) -> Self {
        Self {
            dataset,
            filter: QueryFilter::default(),
            responder,
            prompts,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        }
    }

    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }

    pub async fn reply(&self, user: &str, message: &str) -> Reply {
        match Command::parse(message) {
            Some(Command::Help) => return Reply::fixed(replies::INVENTORY_HELP, ReplyKind::Command),
            Some(Command::Reset) => {
                self.responder.reset(user);
                return Reply::fixed(replies::RESET, ReplyKind::Command);
            }
            None => {}
        }

        let Some(snapshot) = self.dataset.get_or_load().await else {
            return Reply::fixed(replies::NO_INVENTORY, ReplyKind::NoData);
        };

        let filtered = self.filter.filter(&snapshot, message);
        let results = if filtered.is_empty() {
            replies::NO_MATCHES.to_string()
        } else {
            render_rows(&filtered, RESULT_COLUMNS, RESULT_ROWS)
        };
        let summary = location_summary(&snapshot.table);

        let context = match render_template(
            &self.prompts.inventory_context,
            &serde_json::json!({
                "welcome": self.prompts.inventory_welcome,
                "summary": summary,
                "results": results,
            }),
        ) {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!("Falling back to plain inventory context: {}", e);
                format!("{}\n\n{}", summary, results)
            }
        };
        let context = truncate_chars(&context, self.max_context_chars).to_string();

        self.responder
            .respond(
                user,
                self.prompts.inventory_system.clone(),
                context,
                message.trim(),
                INVENTORY_GENERATION,
            )
            .await
    }
}

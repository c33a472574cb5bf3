//! Conversational assistants for Intexta.
//!
//! This crate wires retrieval and filtering to the generation service:
//! - [`DocumentAssistant`] answers from a user's documents
//! - [`InventoryAssistant`] answers from a filtered dataset
//! - Handlebars prompt templates, overridable from YAML
//! - Per-user bounded history behind a [`SessionStore`]

pub mod document;
pub mod inventory;
pub mod prompts;
pub mod replies;
pub mod reply;
pub mod responder;
pub mod session;

#[cfg(test)]
mod tests;

// Re-export main types
pub use document::DocumentAssistant;
pub use inventory::InventoryAssistant;
pub use prompts::{render_template, PromptTemplates};
pub use reply::{Reply, ReplyKind};
pub use responder::{Generation, Responder};
pub use session::{InMemorySessionStore, Session, SessionStore};

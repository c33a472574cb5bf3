//! Sends one conversation turn to the generation service.

use crate::replies::apology;
use crate::reply::{Reply, ReplyKind};
use crate::session::{Session, SessionStore};
use intexta_core::text::char_len;
use intexta_llm::{ChatMessage, LlmClient, LlmRequest};
use std::sync::Arc;

/// Sampling settings of one assistant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Generation {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Generation client plus session history.
#[derive(Clone)]
pub struct Responder {
    llm: Arc<dyn LlmClient>,
    sessions: Arc<dyn SessionStore>,
    model: String,
    history_turns: usize,
}

impl Responder {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        sessions: Arc<dyn SessionStore>,
        model: impl Into<String>,
        history_turns: usize,
    ) -> Self {
        Self {
            llm,
            sessions,
            model: model.into(),
            history_turns,
        }
    }

    pub fn reset(&self, user: &str) {
        self.sessions.evict(user);
        tracing::info!("Session reset for {}", user);
    }

    /// Send `[system, context, history..., message]` and record the turn.
    /// Generation failures become an apology reply.
    pub async fn respond(
        &self,
        user: &str,
        system: String,
        context: String,
        message: &str,
        generation: Generation,
    ) -> Reply {
        let mut session = self
            .sessions
            .get(user)
            .unwrap_or_else(|| Session::new(self.history_turns));

        let context_chars = char_len(&context);
        let mut messages = vec![ChatMessage::system(system), ChatMessage::system(context)];
        messages.extend(session.history().cloned());
        messages.push(ChatMessage::user(message));

        let request = LlmRequest::new(&self.model, messages)
            .with_max_tokens(generation.max_tokens)
            .with_temperature(generation.temperature);

        let (text, kind, usage) = match self.llm.complete(&request).await {
            Ok(response) => (response.content, ReplyKind::Answer, Some(response.usage)),
            Err(err) => {
                tracing::warn!(
                    "Generation via {} failed for {}: {}",
                    self.llm.provider_name(),
                    user,
                    err
                );
                (apology(&err).to_string(), ReplyKind::Failed, None)
            }
        };

        session.push(ChatMessage::user(message));
        session.push(ChatMessage::assistant(text.clone()));
        self.sessions.put(user, session);

        Reply {
            text,
            kind,
            context_chars,
            usage,
        }
    }
}

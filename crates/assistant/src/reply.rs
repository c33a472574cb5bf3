use intexta_llm::LlmUsage;
use serde::Serialize;

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// Generated from the assembled context
    Answer,
    /// Fixed text for a command
    Command,
    /// Nothing to answer from
    NoData,
    /// Generation failed; the text is an apology
    Failed,
}

/// Answer to one user message.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub text: String,
    pub kind: ReplyKind,
    /// Characters of context sent with the request
    pub context_chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<LlmUsage>,
}

impl Reply {
    pub(crate) fn fixed(text: &str, kind: ReplyKind) -> Self {
        Self {
            text: text.to_string(),
            kind,
            context_chars: 0,
            usage: None,
        }
    }
}

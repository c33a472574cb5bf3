use intexta_core::AppError;
use thiserror::Error;

/// Failure of a generation request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// The service did not answer in time
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-2xx status
    #[error("service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The answer could not be understood
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Connection-level failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl LlmError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_to_app_error() {
        let err: AppError = LlmError::HttpStatus {
            status: 503,
            body: "busy".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "LLM error: service returned HTTP 503: busy");
    }
}

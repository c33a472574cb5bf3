//! Error types for Intexta.
//!
//! A single error enum covers configuration, I/O, generation service,
//! dataset and session failures. Retrieval and filtering never fail, so
//! they do not appear here.

use thiserror::Error;

/// Unified error type for Intexta.
///
/// Fallible functions return `Result<T, AppError>`; errors are propagated,
/// never panicked on.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generation service errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Dataset fetch and parse errors
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Session store errors
    #[error("Session error: {0}")]
    Session(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Dataset("sheet unreachable".to_string());
        assert_eq!(err.to_string(), "Dataset error: sheet unreachable");
    }

    #[test]
    fn test_yaml_error_converts_to_serialization() {
        let parsed: Result<Vec<u32>, _> = serde_yaml::from_str("not: [a list");
        let err: AppError = parsed.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}

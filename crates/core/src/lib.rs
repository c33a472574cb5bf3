//! Intexta Core Library
//!
//! Foundational pieces shared by every Intexta crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - Text normalization and Spanish stop words

pub mod config;
pub mod error;
pub mod logging;
pub mod text;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

//! Configuration management for Intexta.
//!
//! Configuration is merged from, in increasing precedence:
//! - Built-in defaults
//! - The YAML config file (`.intexta/config.yaml` or `INTEXTA_CONFIG`)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default DeepSeek endpoints, tried in order.
pub const DEEPSEEK_ENDPOINTS: &[&str] =
    &["https://api.deepseek.com/v1", "https://api.deepseek.com"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .intexta/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Active generation provider ("deepseek", "openai", "ollama")
    pub provider: String,

    /// Default model identifier
    pub model: String,

    /// API key for the generation provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Log output format ("text" or "json")
    pub log_format: String,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Generation provider configurations
    pub llm: Option<LlmConfig>,

    /// Context assembly budgets
    pub retrieval: RetrievalConfig,

    /// Tabular dataset settings
    pub dataset: DatasetConfig,
}

/// Generation provider section of config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    /// Any `/chat/completions` API (DeepSeek, OpenAI)
    OpenAiCompatible {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        #[serde(default)]
        endpoints: Vec<String>,
        timeout: Option<u64>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAiCompatible { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    /// Endpoints to try, in order.
    pub fn endpoints(&self) -> Vec<String> {
        match self {
            Self::OpenAiCompatible { endpoints, .. } => endpoints.clone(),
            Self::Ollama { endpoint, .. } => vec![endpoint.clone()],
        }
    }

    /// Request timeout in seconds.
    pub fn timeout_secs(&self) -> Option<u64> {
        match self {
            Self::OpenAiCompatible { timeout, .. } | Self::Ollama { timeout, .. } => *timeout,
        }
    }
}

/// Character budgets for context assembly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    /// Total characters handed to the generation service
    #[serde(default = "default_context_budget")]
    pub context_budget: usize,

    /// Below this many available characters a document is dropped
    #[serde(default = "default_min_document_chars")]
    pub min_document_chars: usize,
}

fn default_context_budget() -> usize {
    8000
}

fn default_min_document_chars() -> usize {
    500
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            context_budget: default_context_budget(),
            min_document_chars: default_min_document_chars(),
        }
    }
}

/// Tabular dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatasetConfig {
    /// CSV path or URL (Google Sheets links are accepted)
    #[serde(default)]
    pub source: Option<String>,

    /// Conversation turns kept per user
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,

    /// Ceiling for the rendered inventory context
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

fn default_history_turns() -> usize {
    12
}

fn default_max_context_chars() -> usize {
    12_000
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: None,
            history_turns: default_history_turns(),
            max_context_chars: default_max_context_chars(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    retrieval: Option<RetrievalConfig>,
    dataset: Option<DatasetConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    format: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "deepseek".to_string(),
            model: "deepseek-chat".to_string(),
            api_key: None,
            log_level: None,
            log_format: "text".to_string(),
            verbose: false,
            no_color: false,
            llm: None,
            retrieval: RetrievalConfig::default(),
            dataset: DatasetConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config file and environment.
    ///
    /// Environment variables:
    /// - `INTEXTA_WORKSPACE`: Override workspace path
    /// - `INTEXTA_CONFIG`: Path to config file
    /// - `INTEXTA_PROVIDER`: Generation provider
    /// - `INTEXTA_MODEL`: Model identifier
    /// - `INTEXTA_API_KEY`: API key
    /// - `INTEXTA_DATASET`: Dataset source
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("INTEXTA_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("INTEXTA_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.intexta_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        if let Ok(provider) = std::env::var("INTEXTA_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("INTEXTA_MODEL") {
            config.model = model;
        }

        if let Ok(source) = std::env::var("INTEXTA_DATASET") {
            config.dataset.source = Some(source);
        }

        config.api_key = std::env::var("INTEXTA_API_KEY").ok();

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        if let Some(dataset) = config_file.dataset {
            result.dataset = dataset;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();
            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }
            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Path to the .intexta directory.
    pub fn intexta_dir(&self) -> PathBuf {
        self.workspace.join(".intexta")
    }

    /// Configuration of the given provider, if the file declared one.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Endpoints for the active provider, falling back to built-in defaults.
    pub fn provider_endpoints(&self) -> Vec<String> {
        if let Some(endpoints) = self
            .get_provider_config(&self.provider)
            .map(ProviderConfig::endpoints)
            .filter(|e| !e.is_empty())
        {
            return endpoints;
        }

        match self.provider.as_str() {
            "deepseek" => DEEPSEEK_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            "openai" => vec!["https://api.openai.com/v1".to_string()],
            "ollama" => vec!["http://localhost:11434".to_string()],
            _ => Vec::new(),
        }
    }

    /// Request timeout for the active provider, in seconds.
    pub fn provider_timeout_secs(&self) -> u64 {
        self.get_provider_config(&self.provider)
            .and_then(ProviderConfig::timeout_secs)
            .unwrap_or(40)
    }

    /// Resolve the API key for a provider.
    ///
    /// Order: `INTEXTA_API_KEY`, the provider's `apiKeyEnv`, then the
    /// conventional variable for well-known providers.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        if let Some(ProviderConfig::OpenAiCompatible { api_key_env, .. }) =
            self.get_provider_config(provider)
        {
            if let Ok(key) = std::env::var(api_key_env) {
                return Some(key);
            }
        }

        let conventional = match provider {
            "deepseek" => "DEEPSEEK_API_KEY",
            "openai" => "OPENAI_API_KEY",
            _ => return None,
        };
        std::env::var(conventional).ok()
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["deepseek", "openai", "ollama"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.retrieval.context_budget == 0 {
            return Err(AppError::Config(
                "retrieval.contextBudget must be greater than zero".to_string(),
            ));
        }

        if self.retrieval.min_document_chars > self.retrieval.context_budget {
            return Err(AppError::Config(format!(
                "retrieval.minDocumentChars ({}) exceeds contextBudget ({})",
                self.retrieval.min_document_chars, self.retrieval.context_budget
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "deepseek");
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.retrieval.context_budget, 8000);
        assert_eq!(config.retrieval.min_document_chars, 500);
        assert_eq!(config.dataset.history_turns, 12);
        assert!(!config.verbose);
    }

    #[test]
    fn test_intexta_dir() {
        let config = AppConfig::default();
        assert!(config.intexta_dir().ends_with(".intexta"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("ollama".to_string()),
            Some("llama3.2".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "ollama");
        assert_eq!(overridden.model, "llama3.2");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_floor_above_budget() {
        let mut config = AppConfig::default();
        config.retrieval.context_budget = 400;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_deepseek_endpoints() {
        let config = AppConfig::default();
        assert_eq!(
            config.provider_endpoints(),
            vec!["https://api.deepseek.com/v1", "https://api.deepseek.com"]
        );
        assert_eq!(config.provider_timeout_secs(), 40);
    }

    #[test]
    fn test_merge_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  activeProvider: ollama
  providers:
    ollama:
      endpoint: http://localhost:8080
      model: qwen2.5
      timeout: 90
retrieval:
  contextBudget: 60000
logging:
  format: json
  color: false
dataset:
  source: inventario.csv
"#,
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(merged.provider, "ollama");
        assert_eq!(merged.model, "qwen2.5");
        assert_eq!(merged.provider_endpoints(), vec!["http://localhost:8080"]);
        assert_eq!(merged.provider_timeout_secs(), 90);
        assert_eq!(merged.retrieval.context_budget, 60000);
        assert_eq!(merged.retrieval.min_document_chars, 500);
        assert_eq!(merged.log_format, "json");
        assert!(merged.no_color);
        assert_eq!(merged.dataset.source.as_deref(), Some("inventario.csv"));
        assert_eq!(merged.dataset.history_turns, 12);
    }

    #[test]
    fn test_merge_yaml_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "llm: [unterminated").unwrap();
        assert!(matches!(
            AppConfig::default().merge_yaml(&path),
            Err(AppError::Config(_))
        ));
    }
}

//! Configuration management for DocQA.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config files (.docqa/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win. Each YAML section may be partial; missing keys keep
//! their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Generation providers known to the LLM factory.
pub const KNOWN_LLM_PROVIDERS: [&str; 1] = ["ollama"];

/// Embedding providers known to the indexer.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["hashing", "ollama"];

/// Distance cutoff for neural embeddings (squared L2 on unit vectors, cosine >= 0.6).
pub const SEMANTIC_DISTANCE_THRESHOLD: f32 = 0.8;

/// Distance cutoff for hashed trigram embeddings (squared L2 on unit vectors, cosine >= 0.2).
pub const HASHING_DISTANCE_THRESHOLD: f32 = 1.6;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .docqa/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    pub llm: LlmSettings,

    pub embedding: EmbeddingSettings,

    pub chunking: ChunkSettings,

    pub retrieval: RetrievalSettings,
}

/// Generation backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmSettings {
    /// Generation provider (only "ollama" is supported)
    pub provider: String,

    /// Ollama base URL
    pub endpoint: String,

    /// Generation model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Hard deadline for one generation call
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            model: "phi3:mini".to_string(),
            temperature: 0.2,
            timeout_secs: 300,
        }
    }
}

/// Embedding backend settings.
///
/// `model` and `dimensions` fall back to the provider's defaults when unset,
/// so switching `provider` alone is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddingSettings {
    /// Provider name: "hashing" or "ollama"
    pub provider: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,

    /// Texts per embedding batch
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "hashing".to_string(),
            model: None,
            dimensions: None,
            batch_size: 32,
        }
    }
}

impl EmbeddingSettings {
    /// Resolved model name.
    pub fn model(&self) -> &str {
        match (&self.model, self.provider.as_str()) {
            (Some(model), _) => model,
            (None, "ollama") => "nomic-embed-text",
            (None, _) => "trigram-v1",
        }
    }

    /// Resolved vector dimensions.
    pub fn dimensions(&self) -> usize {
        match (self.dimensions, self.provider.as_str()) {
            (Some(dim), _) => dim,
            (None, "ollama") => 768,
            (None, _) => 384,
        }
    }

    /// Default distance cutoff calibrated for this provider's score distribution.
    pub fn default_distance_threshold(&self) -> f32 {
        match self.provider.as_str() {
            "hashing" => HASHING_DISTANCE_THRESHOLD,
            _ => SEMANTIC_DISTANCE_THRESHOLD,
        }
    }
}

/// Fragment splitting settings (characters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChunkSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkSettings {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 100,
        }
    }
}

/// Retrieval and intent detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetrievalSettings {
    /// Candidates requested from the index for every question
    pub fan_out: usize,

    /// Maximum fragments kept for summary requests
    pub summary_limit: usize,

    /// Maximum fragments kept for targeted questions
    pub question_limit: usize,

    /// Override for the targeted-question distance cutoff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_threshold: Option<f32>,

    /// Normalized questions that are summary requests on their own
    pub summary_triggers: Vec<String>,

    /// Phrases that mark a summary request anywhere in the question
    pub summary_phrases: Vec<String>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            fan_out: 8,
            summary_limit: 6,
            question_limit: 3,
            distance_threshold: None,
            summary_triggers: ["summarize", "summary", "overview"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            summary_phrases: [
                "summary",
                "summarize",
                "overview",
                "high level",
                "high level summary",
                "what is this document about",
                "what is this handbook about",
                "give me a summary",
                "summarize this document",
                "summarize the document",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    llm: Option<LlmSettings>,
    embedding: Option<EmbeddingSettings>,
    chunking: Option<ChunkSettings>,
    retrieval: Option<RetrievalSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: LlmSettings::default(),
            embedding: EmbeddingSettings::default(),
            chunking: ChunkSettings::default(),
            retrieval: RetrievalSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// Environment variables:
    /// - `DOCQA_WORKSPACE`: Override workspace path
    /// - `DOCQA_CONFIG`: Path to config file
    /// - `DOCQA_MODEL`: Generation model
    /// - `DOCQA_ENDPOINT`: Ollama base URL
    /// - `DOCQA_TIMEOUT_SECS`: Generation deadline
    /// - `DOCQA_EMBEDDING_PROVIDER`: Embedding provider
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use docqa_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Model: {}", config.llm.model);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Load configuration, taking workspace and config file paths from the
    /// caller before falling back to the environment.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| env_path("DOCQA_WORKSPACE")) {
            config.workspace = workspace;
        }
        config.config_file = config_file.or_else(|| env_path("DOCQA_CONFIG"));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => {
                if !cf.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        cf
                    )));
                }
                cf.clone()
            }
            None => config.docqa_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        config.apply_env()?;
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

        tracing::debug!("Merging config file {:?}", path);
        Ok(self.clone().merge(config_file))
    }

    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(path) = file.workspace.and_then(|ws| ws.path) {
            self.workspace = PathBuf::from(path);
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        if let Some(llm) = file.llm {
            self.llm = llm;
        }
        if let Some(embedding) = file.embedding {
            self.embedding = embedding;
        }
        if let Some(chunking) = file.chunking {
            self.chunking = chunking;
        }
        if let Some(retrieval) = file.retrieval {
            self.retrieval = retrieval;
        }

        self
    }

    /// Environment variables override YAML config.
    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(model) = std::env::var("DOCQA_MODEL") {
            self.llm.model = model;
        }

        if let Ok(endpoint) = std::env::var("DOCQA_ENDPOINT") {
            self.llm.endpoint = endpoint;
        }

        if let Ok(timeout) = std::env::var("DOCQA_TIMEOUT_SECS") {
            self.llm.timeout_secs = timeout.parse().map_err(|e| {
                AppError::Config(format!("Invalid DOCQA_TIMEOUT_SECS '{}': {}", timeout, e))
            })?;
        }

        if let Ok(provider) = std::env::var("DOCQA_EMBEDDING_PROVIDER") {
            self.embedding.provider = provider;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        endpoint: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(model) = model {
            self.llm.model = model;
        }

        if let Some(endpoint) = endpoint {
            self.llm.endpoint = endpoint;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .docqa directory.
    pub fn docqa_dir(&self) -> PathBuf {
        self.workspace.join(".docqa")
    }

    /// Effective distance cutoff for targeted questions.
    pub fn distance_threshold(&self) -> f32 {
        self.retrieval
            .distance_threshold
            .unwrap_or_else(|| self.embedding.default_distance_threshold())
    }

    /// Validate configuration before any work starts.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.embedding.provider.as_str();
        if !KNOWN_EMBEDDING_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.embedding.dimensions() == 0 || self.embedding.batch_size == 0 {
            return Err(AppError::Config(
                "Embedding dimensions and batch size must be positive".to_string(),
            ));
        }

        let chunking = &self.chunking;
        if chunking.chunk_size == 0 || chunking.chunk_overlap >= chunking.chunk_size {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than a positive chunk size ({})",
                chunking.chunk_overlap, chunking.chunk_size
            )));
        }

        let retrieval = &self.retrieval;
        if retrieval.fan_out == 0 {
            return Err(AppError::Config("Retrieval fan-out must be positive".to_string()));
        }
        if retrieval.summary_limit > retrieval.fan_out || retrieval.question_limit > retrieval.fan_out
        {
            return Err(AppError::Config(format!(
                "Selection limits (summary {}, question {}) cannot exceed fan-out {}",
                retrieval.summary_limit, retrieval.question_limit, retrieval.fan_out
            )));
        }
        if let Some(threshold) = retrieval.distance_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(AppError::Config(format!(
                    "Distance threshold must be a non-negative number, got {}",
                    threshold
                )));
            }
        }

        if !KNOWN_LLM_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown LLM provider: {}. Supported: {}",
                self.llm.provider,
                KNOWN_LLM_PROVIDERS.join(", ")
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(AppError::Config("LLM timeout must be positive".to_string()));
        }

        Ok(())
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key).ok().map(PathBuf::from)
}

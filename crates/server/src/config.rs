//! # Application Configuration
//!
//! This module defines the configuration structure for the `pdfinsight-server`
//! and the logic for loading it from a `config.yml` file and environment
//! variables.
//!
//! Credentials are optional at load time. A deployment without, say, a GIPHY key
//! still starts; only requests that need the missing key fail.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use pdfinsight::{
    constants::{
        DEFAULT_EMBEDDING_MODEL, DEFAULT_GENERATION_MODEL, GIPHY_SEARCH_URL,
        PINECONE_CONTROL_PLANE_URL, YOUTUBE_SEARCH_URL,
    },
    providers::search::FailurePolicy,
};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    pub port: u16,
    /// Request body limit for the upload and processing endpoints.
    pub max_upload_bytes: usize,
    /// The generative model used for topics and search queries.
    pub generation: GenerationConfig,
    /// The model used to embed window text.
    pub embedding: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub youtube: SearchApiConfig,
    pub giphy: SearchApiConfig,
    /// How a failed provider query affects its window.
    pub search_policy: SearchPolicyConfig,
}

/// Configuration for the generative model provider.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    /// The type of provider ("gemini" or "local").
    pub provider: String,
    /// The API URL. Derived from the model name for Gemini when absent.
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    pub model_name: String,
}

/// Configuration for the embedding model provider.
#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    /// "gemini" or "local" (any OpenAI-compatible `/embeddings` endpoint).
    pub provider: String,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    pub model_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VectorStoreConfig {
    /// "pinecone" or "memory".
    pub provider: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub index: Option<String>,
    /// Data-plane host. Looked up through the control plane when absent.
    #[serde(default)]
    pub host: Option<String>,
    pub control_plane_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchApiConfig {
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SearchPolicyConfig {
    pub videos: FailurePolicy,
    pub gifs: FailurePolicy,
}

fn default_max_upload_bytes() -> i64 {
    25 * 1024 * 1024
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Treats empty strings as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Fills `slot` from the environment variable `var` when it is still empty.
fn fill_from_env(slot: &mut Option<String>, var: &str) {
    if slot.is_none() {
        *slot = non_empty(env::var(var).ok());
    }
}

/// Loads the application configuration from a file and environment variables.
///
/// Layers, lowest priority first:
/// - Programmatic defaults.
/// - `config.yml` next to the server manifest (or `config_path_override`), with
///   `${VAR}` placeholders substituted from the environment.
/// - Top-level keys like `port` from plain variables such as `PORT`.
/// - Nested keys from `PDFINSIGHT_...` variables (e.g., `PDFINSIGHT_YOUTUBE__API_KEY`).
///
/// Afterwards, any credential still missing is taken from its well-known
/// variable (`GOOGLE_AI_API_KEY`, `PINECONE_API_KEY`, `PINECONE_INDEX`,
/// `YOUTUBE_API_KEY`, `GIPHY_API_KEY`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults.
        .set_default("port", 9090)?
        .set_default("max_upload_bytes", default_max_upload_bytes())?
        .set_default("generation.provider", "gemini")?
        .set_default("generation.model_name", DEFAULT_GENERATION_MODEL)?
        .set_default("embedding.provider", "gemini")?
        .set_default("embedding.model_name", DEFAULT_EMBEDDING_MODEL)?
        .set_default("vector_store.provider", "pinecone")?
        .set_default("vector_store.control_plane_url", PINECONE_CONTROL_PLANE_URL)?
        .set_default("youtube.api_url", YOUTUBE_SEARCH_URL)?
        .set_default("giphy.api_url", GIPHY_SEARCH_URL)?
        .set_default("search_policy.videos", "propagate")?
        .set_default("search_policy.gifs", "degrade")?;

    // Layer 2: Config file, optional unless explicitly requested.
    let config_path = match config_path_override {
        Some(path) => {
            if !std::path::Path::new(path).exists() {
                return Err(ConfigError::NotFound(format!(
                    "Config file not found at '{path}'."
                )));
            }
            path.to_string()
        }
        None => format!("{base_path}/config.yml"),
    };
    match read_and_substitute(&config_path)? {
        Some(content) => {
            info!("Loading configuration from '{config_path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => info!("'{config_path}' not found. Using defaults and environment only."),
    }

    let settings = builder
        // Layer 3: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("PDFINSIGHT")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    // Deserialize the fully resolved configuration into our `AppConfig` struct.
    let mut config: AppConfig = settings.try_deserialize()?;

    // Empty substitutions (`${UNSET_VAR}`) count as absent.
    config.generation.api_url = non_empty(config.generation.api_url);
    config.generation.api_key = non_empty(config.generation.api_key);
    config.embedding.api_url = non_empty(config.embedding.api_url);
    config.embedding.api_key = non_empty(config.embedding.api_key);
    config.vector_store.api_key = non_empty(config.vector_store.api_key);
    config.vector_store.index = non_empty(config.vector_store.index);
    config.vector_store.host = non_empty(config.vector_store.host);
    config.youtube.api_key = non_empty(config.youtube.api_key);
    config.giphy.api_key = non_empty(config.giphy.api_key);

    fill_from_env(&mut config.generation.api_key, "GOOGLE_AI_API_KEY");
    fill_from_env(&mut config.embedding.api_key, "GOOGLE_AI_API_KEY");
    fill_from_env(&mut config.vector_store.api_key, "PINECONE_API_KEY");
    fill_from_env(&mut config.vector_store.index, "PINECONE_INDEX");
    fill_from_env(&mut config.youtube.api_key, "YOUTUBE_API_KEY");
    fill_from_env(&mut config.giphy.api_key, "GIPHY_API_KEY");

    Ok(config)
}

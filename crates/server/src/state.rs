//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The state holds the configuration and the window
//! pipeline, with every provider client constructed once and shared by all
//! request handlers.

use crate::config::AppConfig;
use pdfinsight::{
    constants::GEMINI_API_BASE,
    providers::{
        ai::{
            gemini::GeminiProvider, local::LocalAiProvider, AiProvider, EmbeddingApi,
            EmbeddingProvider, RemoteEmbeddingProvider,
        },
        search::{GiphySearch, YouTubeSearch},
        vector::{InMemoryVectorStore, PineconeStore, VectorStore},
    },
    InsightPipeline,
};
use pdfinsight_pdf::PdfTextExtractor;
use std::sync::Arc;
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The window pipeline with all configured providers.
    pub pipeline: Arc<InsightPipeline>,
}

fn build_ai_provider(config: &AppConfig) -> anyhow::Result<Option<Box<dyn AiProvider>>> {
    let generation = &config.generation;
    match generation.provider.as_str() {
        "gemini" => {
            let Some(api_key) = generation.api_key.clone() else {
                warn!("No Gemini API key configured. Window processing is disabled.");
                return Ok(None);
            };
            // If api_url is not provided in config, construct it from the model name.
            let api_url = generation
                .api_url
                .clone()
                .unwrap_or_else(|| GeminiProvider::url_for_model(&generation.model_name));
            Ok(Some(Box::new(GeminiProvider::new(api_url, api_key)?)))
        }
        "local" => {
            // For local providers, the URL is always required.
            let api_url = generation.api_url.clone().ok_or_else(|| {
                anyhow::anyhow!("generation.api_url is required for the local provider")
            })?;
            Ok(Some(Box::new(LocalAiProvider::new(
                api_url,
                generation.api_key.clone(),
                Some(generation.model_name.clone()),
            )?)))
        }
        other => Err(anyhow::anyhow!("Unsupported generation provider '{other}'")),
    }
}

fn build_embedder(config: &AppConfig) -> anyhow::Result<Option<Box<dyn EmbeddingProvider>>> {
    let embedding = &config.embedding;
    let api = EmbeddingApi::from_provider_name(&embedding.provider).ok_or_else(|| {
        anyhow::anyhow!("Unsupported embedding provider '{}'", embedding.provider)
    })?;
    let api_url = match (api, embedding.api_url.clone()) {
        (_, Some(url)) => url,
        (EmbeddingApi::Gemini, None) => {
            format!("{GEMINI_API_BASE}/{}:embedContent", embedding.model_name)
        }
        (EmbeddingApi::OpenAi, None) => {
            return Err(anyhow::anyhow!(
                "embedding.api_url is required for the '{}' provider",
                embedding.provider
            ))
        }
    };
    if api == EmbeddingApi::Gemini && embedding.api_key.is_none() {
        warn!("No Gemini API key configured for embeddings. Window processing is disabled.");
        return Ok(None);
    }
    Ok(Some(Box::new(RemoteEmbeddingProvider::new(
        api,
        api_url,
        embedding.model_name.clone(),
        embedding.api_key.clone(),
    )?)))
}

fn build_vector_store(config: &AppConfig) -> anyhow::Result<Option<Box<dyn VectorStore>>> {
    let store = &config.vector_store;
    match store.provider.as_str() {
        "memory" => {
            info!("Using the in-memory vector store. Embeddings are lost on restart.");
            Ok(Some(Box::new(InMemoryVectorStore::new())))
        }
        "pinecone" => {
            let (Some(api_key), Some(index)) = (store.api_key.clone(), store.index.clone()) else {
                warn!("Pinecone API key or index is not configured. Window processing is disabled.");
                return Ok(None);
            };
            let mut pinecone = PineconeStore::new(api_key, index)?
                .with_control_plane_url(store.control_plane_url.clone());
            if let Some(host) = store.host.clone() {
                pinecone = pinecone.with_host(host);
            }
            Ok(Some(Box::new(pinecone)))
        }
        other => Err(anyhow::anyhow!("Unsupported vector store provider '{other}'")),
    }
}

/// Builds the shared application state from the configuration.
///
/// Providers whose credentials are missing are left out of the pipeline; the
/// pipeline rejects requests that need them with a configuration error.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let mut builder = InsightPipeline::builder()
        .extractor(Box::new(PdfTextExtractor::new()))
        .video_policy(config.search_policy.videos)
        .gif_policy(config.search_policy.gifs);

    if let Some(ai_provider) = build_ai_provider(&config)? {
        builder = builder.ai_provider(ai_provider);
    }
    if let Some(embedder) = build_embedder(&config)? {
        builder = builder.embedder(embedder);
    }
    if let Some(vector_store) = build_vector_store(&config)? {
        builder = builder.vector_store(vector_store);
    }

    match config.youtube.api_key.clone() {
        Some(key) => {
            builder = builder.video_search(Box::new(YouTubeSearch::with_api_url(
                config.youtube.api_url.clone(),
                Some(key),
            )?));
        }
        None => warn!("No YouTube API key configured. Video recommendations are disabled."),
    }
    match config.giphy.api_key.clone() {
        Some(key) => {
            builder = builder.gif_search(Box::new(GiphySearch::with_api_url(
                config.giphy.api_url.clone(),
                Some(key),
            )?));
        }
        None => warn!("No GIPHY API key configured. Gif recommendations are disabled."),
    }

    Ok(AppState {
        config: Arc::new(config),
        pipeline: Arc::new(builder.build()),
    })
}

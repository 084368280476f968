//! # Window Pipeline
//!
//! Runs one document window through extraction, embedding storage, topic
//! extraction, query generation and media search. Steps run in order; only the
//! provider searches at the end run concurrently.

use crate::{
    errors::InsightError,
    extractor::TextExtractor,
    paginator::WindowSource,
    providers::{
        ai::{AiProvider, EmbeddingProvider},
        search::{search_gifs, search_videos, FailurePolicy, GifSearchProvider, VideoSearchProvider},
        vector::{store_window_embedding, VectorMatch, VectorMetadata, VectorStore},
    },
    recommend::{extract_topics, generate_queries},
    types::{DocumentWindow, MediaResults, Modality, SourceDocument, WindowResults},
};
use async_trait::async_trait;
use tracing::{info, instrument};

/// Holds every collaborator needed to process a window.
///
/// Components are optional so that a partially configured deployment can still
/// start. Requests that need a missing component fail in
/// [`InsightPipeline::ensure_configured`] before any I/O happens.
#[derive(Debug, Clone)]
pub struct InsightPipeline {
    extractor: Option<Box<dyn TextExtractor>>,
    ai_provider: Option<Box<dyn AiProvider>>,
    embedder: Option<Box<dyn EmbeddingProvider>>,
    vector_store: Option<Box<dyn VectorStore>>,
    video_search: Option<Box<dyn VideoSearchProvider>>,
    gif_search: Option<Box<dyn GifSearchProvider>>,
    video_policy: FailurePolicy,
    gif_policy: FailurePolicy,
}

/// Builder for [`InsightPipeline`].
#[derive(Debug)]
pub struct InsightPipelineBuilder {
    pipeline: InsightPipeline,
}

impl Default for InsightPipelineBuilder {
    fn default() -> Self {
        Self {
            pipeline: InsightPipeline {
                extractor: None,
                ai_provider: None,
                embedder: None,
                vector_store: None,
                video_search: None,
                gif_search: None,
                video_policy: FailurePolicy::Propagate,
                gif_policy: FailurePolicy::Degrade,
            },
        }
    }
}

impl InsightPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.pipeline.extractor = Some(extractor);
        self
    }

    pub fn ai_provider(mut self, ai_provider: Box<dyn AiProvider>) -> Self {
        self.pipeline.ai_provider = Some(ai_provider);
        self
    }

    pub fn embedder(mut self, embedder: Box<dyn EmbeddingProvider>) -> Self {
        self.pipeline.embedder = Some(embedder);
        self
    }

    pub fn vector_store(mut self, vector_store: Box<dyn VectorStore>) -> Self {
        self.pipeline.vector_store = Some(vector_store);
        self
    }

    pub fn video_search(mut self, video_search: Box<dyn VideoSearchProvider>) -> Self {
        self.pipeline.video_search = Some(video_search);
        self
    }

    pub fn gif_search(mut self, gif_search: Box<dyn GifSearchProvider>) -> Self {
        self.pipeline.gif_search = Some(gif_search);
        self
    }

    pub fn video_policy(mut self, policy: FailurePolicy) -> Self {
        self.pipeline.video_policy = policy;
        self
    }

    pub fn gif_policy(mut self, policy: FailurePolicy) -> Self {
        self.pipeline.gif_policy = policy;
        self
    }

    pub fn build(self) -> InsightPipeline {
        self.pipeline
    }
}

fn require<'a, T: ?Sized>(slot: &'a Option<Box<T>>, what: &str) -> Result<&'a T, InsightError> {
    slot.as_deref()
        .ok_or_else(|| InsightError::Configuration(format!("{what} is not configured")))
}

impl InsightPipeline {
    pub fn builder() -> InsightPipelineBuilder {
        InsightPipelineBuilder::new()
    }

    /// Checks that every component `modality` needs is present and that its
    /// search provider has credentials.
    pub fn ensure_configured(&self, modality: Modality) -> Result<(), InsightError> {
        require(&self.extractor, "Text extractor")?;
        require(&self.ai_provider, "Generative model provider")?;
        require(&self.embedder, "Embedding provider")?;
        require(&self.vector_store, "Vector store")?;
        match modality {
            Modality::Videos => {
                require(&self.video_search, "YouTube search")?.check_credentials()?
            }
            Modality::Gifs => require(&self.gif_search, "GIPHY search")?.check_credentials()?,
            Modality::Pics => {}
        }
        Ok(())
    }

    /// Processes one window of `document` and returns its topics,
    /// recommendations and, for videos and gifs, the provider results.
    #[instrument(skip(self, document), fields(file = %document.file_name, range = %window.page_range()))]
    pub async fn process_window(
        &self,
        document: &SourceDocument,
        window: DocumentWindow,
        modality: Modality,
    ) -> Result<WindowResults, InsightError> {
        self.ensure_configured(modality)?;
        let extractor = require(&self.extractor, "Text extractor")?;
        let ai_provider = require(&self.ai_provider, "Generative model provider")?;
        let embedder = require(&self.embedder, "Embedding provider")?;
        let vector_store = require(&self.vector_store, "Vector store")?;

        // --- 1. Extract the window text ---
        let extracted = extractor.extract(&document.bytes, window).await?;
        info!(
            chars = extracted.text.len(),
            total_pages = extracted.total_pages,
            "Extracted window text."
        );

        // --- 2. Embed and store ---
        let page_range = window.page_range();
        let values = embedder.embed(&extracted.text).await?;
        let metadata = VectorMetadata {
            file_name: document.file_name.clone(),
            page_count: window.page_count(),
            start_page: window.start_page(),
            page_range: page_range.clone(),
        };
        store_window_embedding(vector_store, &page_range, values, metadata).await?;

        // --- 3. Topics and queries ---
        let topics = extract_topics(ai_provider, &extracted.text).await;
        let recommendations = generate_queries(ai_provider, &topics, modality).await?;

        // --- 4. Provider search ---
        let results = match modality {
            Modality::Videos => {
                let provider = require(&self.video_search, "YouTube search")?;
                let sets = search_videos(provider, &recommendations, self.video_policy).await?;
                Some(MediaResults::Videos(sets))
            }
            Modality::Gifs => {
                let provider = require(&self.gif_search, "GIPHY search")?;
                let sets = search_gifs(provider, &recommendations, self.gif_policy).await?;
                Some(MediaResults::Gifs(sets))
            }
            Modality::Pics => None,
        };

        info!(
            topics = topics.len(),
            recommendations = recommendations.len(),
            "Window {page_range} processed."
        );

        Ok(WindowResults {
            page_range,
            total_pages: extracted.total_pages,
            topics,
            recommendations,
            results,
        })
    }

    /// Embeds `query` and returns the nearest stored window records.
    pub async fn search_pages(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<VectorMatch>, InsightError> {
        let embedder = require(&self.embedder, "Embedding provider")?;
        let vector_store = require(&self.vector_store, "Vector store")?;
        let vector = embedder.embed(query).await?;
        Ok(vector_store.query(&vector, top_k).await?)
    }
}

#[async_trait]
impl WindowSource for InsightPipeline {
    async fn fetch_window(
        &self,
        document: &SourceDocument,
        window: DocumentWindow,
        modality: Modality,
    ) -> Result<WindowResults, InsightError> {
        self.process_window(document, window, modality).await
    }
}

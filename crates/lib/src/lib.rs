//! # PDF Insight Engine
//!
//! Extracts topics from page windows of a PDF, turns them into search queries
//! and gathers matching videos or gifs, storing one embedding per window.
//!
//! The [`InsightPipeline`] processes a single window. The [`Paginator`] walks a
//! document window by window against any [`WindowSource`].

pub mod constants;
pub mod errors;
pub mod extractor;
pub mod paginator;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod recommend;
pub mod types;

pub use errors::{InsightError, PromptError};
pub use extractor::TextExtractor;
pub use paginator::{past_last_page, yields_no_content, PaginationState, Paginator, WindowSource};
pub use pipeline::{InsightPipeline, InsightPipelineBuilder};
pub use types::{
    DocumentWindow, ExtractedText, Gif, MediaResults, Modality, SourceDocument, Video,
    WindowResults,
};

pub mod embedding;
pub mod gemini;
pub mod local;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::{EmbeddingApi, RemoteEmbeddingProvider};
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This trait defines a common interface for text generation across different
/// Large Language Models (e.g., Gemini, local OpenAI-compatible models).
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    ///
    /// The result should be a string containing the AI's response.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);

/// A trait for turning text into a fixed-length vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug + DynClone {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PromptError>;
}

dyn_clone::clone_trait_object!(EmbeddingProvider);

//! # Vector Store
//!
//! One embedding record is written per processed window. Records are keyed by
//! page range, so re-processing a window replaces its record.

pub mod memory;
pub mod pinecone;

use crate::constants::VECTOR_ID_PREFIX;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;
use tracing::info;

pub use memory::InMemoryVectorStore;
pub use pinecone::PineconeStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Vector store is not configured: {0}")]
    MissingConfig(String),
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to vector store: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Vector store returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to deserialize vector store response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Vector store internal error: {0}")]
    Internal(String),
}

/// Metadata attached to every window record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorMetadata {
    pub file_name: String,
    pub page_count: u32,
    pub start_page: u32,
    #[serde(default)]
    pub page_range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: VectorMetadata,
}

/// A stored record returned by a similarity query, best match first.
///
/// Metadata stays untyped: Pinecone hands numeric fields back as floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// A store for window embeddings.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug + DynClone {
    /// Writes a record, replacing any record with the same id.
    async fn upsert(&self, record: VectorRecord) -> Result<(), StoreError>;

    /// Returns up to `top_k` records nearest to `vector`.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, StoreError>;
}

dyn_clone::clone_trait_object!(VectorStore);

/// Record id for a page range, e.g. `pdf-1-10`.
pub fn record_id(page_range: &str) -> String {
    format!("{VECTOR_ID_PREFIX}{page_range}")
}

/// Stores the embedding for one window as `pdf-<page_range>`.
pub async fn store_window_embedding(
    store: &dyn VectorStore,
    page_range: &str,
    values: Vec<f32>,
    mut metadata: VectorMetadata,
) -> Result<(), StoreError> {
    metadata.page_range = page_range.to_string();
    let record = VectorRecord {
        id: record_id(page_range),
        values,
        metadata,
    };
    info!(id = %record.id, dimensions = record.values.len(), "Upserting window embedding.");
    store.upsert(record).await
}

//! A Pinecone data-plane client.
//!
//! The index host is either configured or looked up once through the control
//! plane and then reused for every request made through this handle.

use super::{StoreError, VectorMatch, VectorRecord, VectorStore};
use crate::constants::{PINECONE_API_VERSION, PINECONE_CONTROL_PLANE_URL};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

#[derive(Serialize, Debug)]
struct UpsertRequest<'a> {
    vectors: [&'a VectorRecord; 1],
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize, Debug)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

#[derive(Deserialize, Debug)]
struct IndexDescription {
    host: String,
}

#[derive(Clone, Debug)]
pub struct PineconeStore {
    client: ReqwestClient,
    api_key: String,
    index_name: String,
    control_plane_url: String,
    host: Arc<OnceCell<String>>,
}

impl PineconeStore {
    /// Creates a handle for `index_name`. The host is resolved on first use.
    pub fn new(api_key: String, index_name: String) -> Result<Self, StoreError> {
        if api_key.is_empty() {
            return Err(StoreError::MissingConfig(
                "Pinecone API key is not configured".to_string(),
            ));
        }
        if index_name.is_empty() {
            return Err(StoreError::MissingConfig(
                "Pinecone index name is not configured".to_string(),
            ));
        }
        let client = ReqwestClient::builder()
            .build()
            .map_err(StoreError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_key,
            index_name,
            control_plane_url: PINECONE_CONTROL_PLANE_URL.to_string(),
            host: Arc::new(OnceCell::new()),
        })
    }

    pub fn with_control_plane_url(mut self, url: String) -> Self {
        self.control_plane_url = url;
        self
    }

    /// Skips the control-plane lookup and talks to `host` directly.
    pub fn with_host(mut self, host: String) -> Self {
        self.host = Arc::new(OnceCell::new_with(Some(normalize_host(&host))));
        self
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
    }

    async fn host(&self) -> Result<&str, StoreError> {
        let host = self
            .host
            .get_or_try_init(|| self.describe_index_host())
            .await?;
        Ok(host.as_str())
    }

    async fn describe_index_host(&self) -> Result<String, StoreError> {
        let url = format!(
            "{}/indexes/{}",
            self.control_plane_url.trim_end_matches('/'),
            self.index_name
        );
        info!(index = %self.index_name, "Resolving Pinecone index host.");
        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = check_status(response).await?;
        let description: IndexDescription = response
            .json()
            .await
            .map_err(StoreError::Deserialization)?;
        Ok(normalize_host(&description.host))
    }
}

/// Adds `https://` to bare hostnames, as returned by the control plane.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    error!("Pinecone API error ({status}): {body}");
    Err(StoreError::Api { status, body })
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn upsert(&self, record: VectorRecord) -> Result<(), StoreError> {
        let url = format!("{}/vectors/upsert", self.host().await?);
        debug!(id = %record.id, "--> Upserting vector to Pinecone");
        let body = UpsertRequest { vectors: [&record] };
        let response = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, StoreError> {
        let url = format!("{}/query", self.host().await?);
        debug!(top_k, "--> Querying Pinecone");
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };
        let response = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(StoreError::Deserialization)?;
        Ok(parsed.matches)
    }
}

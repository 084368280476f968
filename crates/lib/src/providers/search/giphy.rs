use super::{GifSearchProvider, SearchError};
use crate::{
    constants::{GIF_QUERY_MAX_CHARS, GIPHY_SEARCH_URL, MAX_RESULTS_PER_QUERY},
    types::Gif,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::{debug, error};

const PROVIDER: &str = "GIPHY";

// --- GIPHY search response structures ---

#[derive(Deserialize, Debug)]
struct GiphySearchResponse {
    #[serde(default)]
    data: Vec<GiphyItem>,
}

#[derive(Deserialize, Debug)]
struct GiphyItem {
    id: String,
    #[serde(default)]
    title: String,
    images: GiphyImages,
}

#[derive(Deserialize, Debug)]
struct GiphyImages {
    original: GiphyImage,
    fixed_height: GiphyImage,
}

#[derive(Deserialize, Debug)]
struct GiphyImage {
    url: String,
}

impl From<GiphyItem> for Gif {
    fn from(item: GiphyItem) -> Self {
        Gif {
            id: item.id,
            title: item.title,
            url: item.images.original.url,
            preview: item.images.fixed_height.url,
        }
    }
}

/// Cuts a query to the provider's length limit on a character boundary.
pub fn truncate_query(query: &str) -> &str {
    match query.char_indices().nth(GIF_QUERY_MAX_CHARS) {
        Some((byte_index, _)) => &query[..byte_index],
        None => query,
    }
}

/// Gif search backed by the GIPHY search endpoint, rated for general audiences.
#[derive(Clone, Debug)]
pub struct GiphySearch {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl GiphySearch {
    /// Creates a client for the public GIPHY endpoint.
    pub fn new(api_key: Option<String>) -> Result<Self, SearchError> {
        Self::with_api_url(GIPHY_SEARCH_URL.to_string(), api_key)
    }

    pub fn with_api_url(api_url: String, api_key: Option<String>) -> Result<Self, SearchError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(SearchError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    fn api_key(&self) -> Result<&str, SearchError> {
        self.api_key
            .as_deref()
            .ok_or(SearchError::MissingApiKey { provider: PROVIDER })
    }
}

#[async_trait]
impl GifSearchProvider for GiphySearch {
    async fn search(&self, query: &str) -> Result<Vec<Gif>, SearchError> {
        let api_key = self.api_key()?;

        let query = truncate_query(query);
        debug!(query = %query, "--> Searching GIPHY");
        let limit = MAX_RESULTS_PER_QUERY.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("api_key", api_key),
                ("q", query),
                ("limit", limit.as_str()),
                ("rating", "g"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("GIPHY API error ({status}): {body}");
            return Err(SearchError::Api {
                provider: PROVIDER,
                status,
                body,
            });
        }

        let search: GiphySearchResponse = response
            .json()
            .await
            .map_err(SearchError::Deserialization)?;

        Ok(search
            .data
            .into_iter()
            .take(MAX_RESULTS_PER_QUERY)
            .map(Gif::from)
            .collect())
    }

    fn check_credentials(&self) -> Result<(), SearchError> {
        self.api_key().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_query;

    #[test]
    fn test_truncate_query_keeps_short_queries() {
        assert_eq!(truncate_query("cell biology"), "cell biology");
    }

    #[test]
    fn test_truncate_query_cuts_to_limit() {
        let long = "a".repeat(150);
        assert_eq!(truncate_query(&long).len(), 100);
    }

    #[test]
    fn test_truncate_query_respects_char_boundaries() {
        let long = "é".repeat(120);
        let truncated = truncate_query(&long);
        assert_eq!(truncated.chars().count(), 100);
    }
}

use super::{SearchError, VideoSearchProvider};
use crate::{
    constants::{MAX_RESULTS_PER_QUERY, YOUTUBE_SEARCH_URL},
    types::Video,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::{debug, error};

const PROVIDER: &str = "YouTube";

// --- YouTube Data API v3 response structures ---

#[derive(Deserialize, Debug)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize, Debug)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    #[serde(default)]
    video_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Debug)]
struct Thumbnails {
    medium: Thumbnail,
}

#[derive(Deserialize, Debug)]
struct Thumbnail {
    url: String,
}

impl From<SearchItem> for Video {
    fn from(item: SearchItem) -> Self {
        Video {
            id: item.id.video_id,
            title: item.snippet.title,
            thumbnail: item.snippet.thumbnails.medium.url,
            channel_title: item.snippet.channel_title,
        }
    }
}

/// Video search backed by the YouTube Data API `search.list` endpoint.
#[derive(Clone, Debug)]
pub struct YouTubeSearch {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl YouTubeSearch {
    /// Creates a client for the public YouTube endpoint.
    pub fn new(api_key: Option<String>) -> Result<Self, SearchError> {
        Self::with_api_url(YOUTUBE_SEARCH_URL.to_string(), api_key)
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
impl VideoSearchProvider for YouTubeSearch {
    async fn search(&self, query: &str) -> Result<Vec<Video>, SearchError> {
        let api_key = self.api_key()?;

        debug!(query = %query, "--> Searching YouTube");
        let max_results = MAX_RESULTS_PER_QUERY.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("part", "snippet"),
                ("maxResults", max_results.as_str()),
                ("q", query),
                ("type", "video"),
                ("key", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("YouTube API error ({status}): {body}");
            return Err(SearchError::Api {
                provider: PROVIDER,
                status,
                body,
            });
        }

        let list: SearchListResponse = response
            .json()
            .await
            .map_err(SearchError::Deserialization)?;

        Ok(list
            .items
            .into_iter()
            .take(MAX_RESULTS_PER_QUERY)
            .map(Video::from)
            .collect())
    }

    fn check_credentials(&self) -> Result<(), SearchError> {
        self.api_key().map(|_| ())
    }
}

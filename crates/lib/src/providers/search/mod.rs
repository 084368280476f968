//! # Media Search Providers
//!
//! Clients for the external video and gif search APIs, plus the fan-out helper
//! that runs one search per recommendation concurrently.

pub mod giphy;
pub mod youtube;

use crate::types::{Gif, Video};
use async_trait::async_trait;
use dyn_clone::DynClone;
use futures::future::join_all;
use serde::Deserialize;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{info, warn};

pub use giphy::GiphySearch;
pub use youtube::YouTubeSearch;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{provider} API key is not configured")]
    MissingApiKey { provider: &'static str },
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to search provider: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{provider} API returned status {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("Failed to deserialize search provider response: {0}")]
    Deserialization(reqwest::Error),
}

/// Searches an external API for videos matching a query.
#[async_trait]
pub trait VideoSearchProvider: Send + Sync + Debug + DynClone {
    async fn search(&self, query: &str) -> Result<Vec<Video>, SearchError>;

    /// Fails with `MissingApiKey` when the provider cannot make any request.
    fn check_credentials(&self) -> Result<(), SearchError> {
        Ok(())
    }
}

dyn_clone::clone_trait_object!(VideoSearchProvider);

/// Searches an external API for gifs matching a query.
#[async_trait]
pub trait GifSearchProvider: Send + Sync + Debug + DynClone {
    async fn search(&self, query: &str) -> Result<Vec<Gif>, SearchError>;

    /// Fails with `MissingApiKey` when the provider cannot make any request.
    fn check_credentials(&self) -> Result<(), SearchError> {
        Ok(())
    }
}

dyn_clone::clone_trait_object!(GifSearchProvider);

/// How the fan-out treats a single failed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Any failed query fails the whole batch.
    Propagate,
    /// A failed query contributes an empty result list.
    Degrade,
}

/// Runs one video search per query concurrently, results index-aligned with `queries`.
pub async fn search_videos(
    provider: &dyn VideoSearchProvider,
    queries: &[String],
    policy: FailurePolicy,
) -> Result<Vec<Vec<Video>>, SearchError> {
    info!("Searching videos for {} queries.", queries.len());
    let outcomes = join_all(queries.iter().map(|query| provider.search(query))).await;
    collect_with_policy(outcomes, policy)
}

/// Runs one gif search per query concurrently, results index-aligned with `queries`.
pub async fn search_gifs(
    provider: &dyn GifSearchProvider,
    queries: &[String],
    policy: FailurePolicy,
) -> Result<Vec<Vec<Gif>>, SearchError> {
    info!("Searching gifs for {} queries.", queries.len());
    let outcomes = join_all(queries.iter().map(|query| provider.search(query))).await;
    collect_with_policy(outcomes, policy)
}

/// Joins per-query outcomes under a failure policy.
///
/// A missing API key is a configuration problem and always fails the batch,
/// whatever the policy says.
pub fn collect_with_policy<T>(
    outcomes: Vec<Result<Vec<T>, SearchError>>,
    policy: FailurePolicy,
) -> Result<Vec<Vec<T>>, SearchError> {
    outcomes
        .into_iter()
        .enumerate()
        .map(|(index, outcome)| match (outcome, policy) {
            (Ok(items), _) => Ok(items),
            (Err(e @ SearchError::MissingApiKey { .. }), _) => Err(e),
            (Err(e), FailurePolicy::Propagate) => Err(e),
            (Err(e), FailurePolicy::Degrade) => {
                warn!("Search for query #{index} failed, using empty results: {e}");
                Ok(Vec::new())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error() -> SearchError {
        SearchError::Api {
            provider: "GIPHY",
            status: 500,
            body: "boom".to_string(),
        }
    }

    #[test]
    fn test_degrade_replaces_failures_with_empty_lists() {
        let outcomes = vec![Ok(vec![1, 2]), Err(api_error()), Ok(vec![3])];
        let collected = collect_with_policy(outcomes, FailurePolicy::Degrade).unwrap();
        assert_eq!(collected, vec![vec![1, 2], vec![], vec![3]]);
    }

    #[test]
    fn test_propagate_fails_whole_batch() {
        let outcomes = vec![Ok(vec![1]), Err(api_error()), Ok(vec![3])];
        let result = collect_with_policy(outcomes, FailurePolicy::Propagate);
        assert!(matches!(result, Err(SearchError::Api { status: 500, .. })));
    }

    #[test]
    fn test_missing_key_is_never_degraded() {
        let outcomes: Vec<Result<Vec<u8>, SearchError>> =
            vec![Err(SearchError::MissingApiKey { provider: "GIPHY" })];
        let result = collect_with_policy(outcomes, FailurePolicy::Degrade);
        assert!(matches!(result, Err(SearchError::MissingApiKey { .. })));
    }
}

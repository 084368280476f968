use crate::providers::{search::SearchError, vector::StoreError};
use thiserror::Error;

/// Errors raised while talking to a generative-model or embedding API.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
}

/// The error taxonomy surfaced at the window-processing boundary.
///
/// Anything that is not recovered locally (topic fallback, degraded gif
/// searches) ends up here and is reported to the caller as a failed window.
#[derive(Error, Debug)]
pub enum InsightError {
    /// Missing credentials or components. Raised before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The document bytes could not be parsed.
    #[error("Failed to extract text from document: {0}")]
    Extraction(String),

    #[error("Invalid document window: {0}")]
    InvalidWindow(String),

    #[error("Language model request failed: {0}")]
    Model(#[from] PromptError),

    #[error("{0}")]
    Search(SearchError),

    #[error("Vector store write failed: {0}")]
    Storage(#[from] StoreError),

    /// A remote `WindowSource` (e.g. the HTTP API) reported a failure.
    #[error("Remote processing failed: {0}")]
    Remote(String),
}

impl From<SearchError> for InsightError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::MissingApiKey { provider } => {
                InsightError::Configuration(format!("{provider} API key is not configured"))
            }
            other => InsightError::Search(other),
        }
    }
}

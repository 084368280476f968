//! # API Client
//!
//! Talks to `pdfinsight-server` over HTTP. The client holds no document state:
//! every window request re-sends the full document as multipart form data.

use anyhow::{bail, Result};
use async_trait::async_trait;
use pdfinsight::{
    DocumentWindow, InsightError, MediaResults, Modality, SourceDocument, WindowResults,
    WindowSource,
};
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:9090";

/// Response body of `POST /upload-pdf`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    pub file_size: u64,
}

/// Response body of `POST /process-pdf`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessResponse {
    page_range: String,
    total_pages: u32,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    results: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// The client for making API calls to the `pdfinsight-server`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn document_part(document: &SourceDocument) -> Result<Part, reqwest::Error> {
        Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str("application/pdf")
    }

    /// Uploads a document and returns the server's acknowledgement.
    pub async fn upload(&self, document: &SourceDocument) -> Result<UploadResponse> {
        let url = format!("{}/upload-pdf", self.base_url);
        info!("Uploading '{}' to: {}", document.file_name, url);

        let form = Form::new().part("file", Self::document_part(document)?);
        let response = self.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Upload failed with status {status}: {}", error_message(&body));
        }

        Ok(response.json::<UploadResponse>().await?)
    }
}

/// Pulls the `error` field out of a JSON error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl WindowSource for ApiClient {
    async fn fetch_window(
        &self,
        document: &SourceDocument,
        window: DocumentWindow,
        modality: Modality,
    ) -> Result<WindowResults, InsightError> {
        let url = format!("{}/process-pdf", self.base_url);
        let part =
            Self::document_part(document).map_err(|e| InsightError::Remote(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("startPage", window.start_page().to_string())
            .text("pageCount", window.page_count().to_string())
            .text("type", modality.as_str());

        debug!(%url, pages = %window.page_range(), "--> Requesting window");
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| InsightError::Remote(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Remote(format!(
                "status {status}: {}",
                error_message(&body)
            )));
        }

        let body: ProcessResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Remote(format!("invalid response body: {e}")))?;

        let results = match body.results {
            Some(value) => MediaResults::from_value(modality, value)
                .map_err(|e| InsightError::Remote(format!("invalid results: {e}")))?,
            None => None,
        };

        Ok(WindowResults {
            page_range: body.page_range,
            total_pages: body.total_pages,
            topics: body.topics,
            recommendations: body.recommendations,
            results,
        })
    }
}

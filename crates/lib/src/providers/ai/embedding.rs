//! # Embeddings Provider
//!
//! This module provides functionality for generating vector embeddings by calling
//! either the Gemini `embedContent` API or an OpenAI-compatible embeddings API.

use crate::{errors::PromptError, providers::ai::EmbeddingProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct OpenAIEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize, Debug)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct OpenAIEmbeddingData {
    embedding: Vec<f32>,
}

// --- Gemini-specific request and response structures ---

#[derive(Serialize, Debug)]
struct GeminiEmbeddingRequest<'a> {
    model: String,
    content: GeminiEmbeddingContent<'a>,
}

#[derive(Serialize, Debug)]
struct GeminiEmbeddingContent<'a> {
    parts: Vec<GeminiEmbeddingPart<'a>>,
}

#[derive(Serialize, Debug)]
struct GeminiEmbeddingPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GeminiEmbeddingResponse {
    embedding: GeminiEmbeddingValue,
}

#[derive(Deserialize, Debug)]
struct GeminiEmbeddingValue {
    values: Vec<f32>,
}

/// Which wire format the embeddings endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingApi {
    #[default]
    Gemini,
    OpenAi,
}

impl EmbeddingApi {
    /// Picks the wire format from a configured provider name (`"gemini"` or `"local"`).
    pub fn from_provider_name(name: &str) -> Option<Self> {
        match name {
            "gemini" => Some(EmbeddingApi::Gemini),
            "local" | "openai" => Some(EmbeddingApi::OpenAi),
            _ => None,
        }
    }
}

/// Generates embeddings through a remote HTTP API.
#[derive(Clone, Debug)]
pub struct RemoteEmbeddingProvider {
    client: ReqwestClient,
    api: EmbeddingApi,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl RemoteEmbeddingProvider {
    pub fn new(
        api: EmbeddingApi,
        api_url: String,
        model: String,
        api_key: Option<String>,
    ) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api,
            api_url,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PromptError> {
        generate_embedding(
            &self.client,
            self.api,
            &self.api_url,
            &self.model,
            text,
            self.api_key.as_deref(),
        )
        .await
    }
}

/// Generates a vector embedding for a given text input using an external API.
pub async fn generate_embedding(
    client: &ReqwestClient,
    api: EmbeddingApi,
    api_url: &str,
    model: &str,
    input: &str,
    api_key: Option<&str>,
) -> Result<Vec<f32>, PromptError> {
    let mut request_builder = client.post(api_url);

    // --- 1. Construct the appropriate request body and apply auth ---
    match api {
        EmbeddingApi::Gemini => {
            // Gemini requires the model name to be prefixed with "models/" in the payload.
            let gemini_model_name = if model.starts_with("models/") {
                model.to_string()
            } else {
                format!("models/{model}")
            };

            let request_body = GeminiEmbeddingRequest {
                model: gemini_model_name,
                content: GeminiEmbeddingContent {
                    parts: vec![GeminiEmbeddingPart { text: input }],
                },
            };
            debug!(model = %request_body.model, chars = input.len(), "--> Sending request to Gemini Embeddings API");
            request_builder = request_builder.json(&request_body);
            if let Some(key) = api_key {
                request_builder = request_builder.header("x-goog-api-key", key);
            }
        }
        EmbeddingApi::OpenAi => {
            let request_body = OpenAIEmbeddingRequest { model, input };
            debug!(model = %model, chars = input.len(), "--> Sending request to OpenAI-compatible Embeddings API");
            request_builder = request_builder.json(&request_body);
            if let Some(key) = api_key {
                request_builder = request_builder.bearer_auth(key);
            }
        }
    }

    // --- 2. Send the request and handle the response ---
    let response = request_builder
        .send()
        .await
        .map_err(PromptError::AiRequest)?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(PromptError::AiApi(error_text));
    }

    match api {
        EmbeddingApi::Gemini => {
            let gemini_response: GeminiEmbeddingResponse = response
                .json()
                .await
                .map_err(PromptError::AiDeserialization)?;
            Ok(gemini_response.embedding.values)
        }
        EmbeddingApi::OpenAi => {
            let openai_response: OpenAIEmbeddingResponse = response
                .json()
                .await
                .map_err(PromptError::AiDeserialization)?;

            openai_response
                .data
                .into_iter()
                .next()
                .map(|d| d.embedding)
                .ok_or_else(|| {
                    PromptError::AiApi("OpenAI-compatible API returned no embeddings".to_string())
                })
        }
    }
}

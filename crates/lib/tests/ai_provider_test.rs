//! # Model Provider Tests
//!
//! Checks the request bodies sent to Gemini and the embedding APIs.

use anyhow::Result;
use pdfinsight::{
    errors::PromptError,
    providers::ai::{
        gemini::GeminiProvider, local::LocalAiProvider, AiProvider, EmbeddingApi,
        EmbeddingProvider, RemoteEmbeddingProvider,
    },
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_gemini_request_shape() -> Result<()> {
    // --- 1. Arrange ---
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "gm-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "Be brief." }] },
            "contents": [{ "role": "user", "parts": [{ "text": "Hello" }] }],
            "generationConfig": { "topK": 40 },
            "safetySettings": [
                { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hi." }], "role": "model" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(
        format!("{}/models/gemini-2.0-flash:generateContent", server.uri()),
        "gm-key".to_string(),
    )?;

    // --- 2. Act ---
    let reply = provider.generate("Be brief.", "Hello").await?;

    // --- 3. Assert ---
    assert_eq!(reply, "Hi.");
    Ok(())
}

#[tokio::test]
async fn test_gemini_error_status() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(server.uri(), "gm-key".to_string())?;
    let result = provider.generate("system", "user").await;

    match result {
        Err(PromptError::AiApi(body)) => assert_eq!(body, "RESOURCE_EXHAUSTED"),
        other => panic!("expected an API error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_gemini_url_for_model() {
    assert_eq!(
        GeminiProvider::url_for_model("gemini-2.0-flash"),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
    );
}

#[tokio::test]
async fn test_local_provider_chat_format() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer local-key"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system", "content": "sys" },
                { "role": "user", "content": "usr" }
            ],
            "model": "llama"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "[\"a\"]" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = LocalAiProvider::new(
        format!("{}/v1/chat/completions", server.uri()),
        Some("local-key".to_string()),
        Some("llama".to_string()),
    )?;

    assert_eq!(provider.generate("sys", "usr").await?, "[\"a\"]");
    Ok(())
}

#[tokio::test]
async fn test_gemini_embedding_request() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/text-embedding-004:embedContent"))
        .and(header("x-goog-api-key", "gm-key"))
        .and(body_json(json!({
            "model": "models/text-embedding-004",
            "content": { "parts": [{ "text": "page text" }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embedding": { "values": [0.25, -0.5, 1.0] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = RemoteEmbeddingProvider::new(
        EmbeddingApi::Gemini,
        format!("{}/models/text-embedding-004:embedContent", server.uri()),
        "text-embedding-004".to_string(),
        Some("gm-key".to_string()),
    )?;

    assert_eq!(embedder.embed("page text").await?, vec![0.25, -0.5, 1.0]);
    Ok(())
}

#[tokio::test]
async fn test_openai_embedding_request() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_json(json!({ "model": "mini", "input": "page text" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": [0.5, 0.5], "index": 0 }]
        })))
        .mount(&server)
        .await;

    let embedder = RemoteEmbeddingProvider::new(
        EmbeddingApi::OpenAi,
        format!("{}/v1/embeddings", server.uri()),
        "mini".to_string(),
        None,
    )?;

    assert_eq!(embedder.embed("page text").await?, vec![0.5, 0.5]);
    Ok(())
}

#[test]
fn test_embedding_api_from_provider_name() {
    assert_eq!(
        EmbeddingApi::from_provider_name("gemini"),
        Some(EmbeddingApi::Gemini)
    );
    assert_eq!(
        EmbeddingApi::from_provider_name("local"),
        Some(EmbeddingApi::OpenAi)
    );
    assert_eq!(EmbeddingApi::from_provider_name("bedrock"), None);
}

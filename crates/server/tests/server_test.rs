//! # Server Endpoint Tests
//!
//! Spawns the real router and drives `/upload-pdf`, `/process-pdf` and
//! `/search/pages` over HTTP, with every external API mocked.

mod common;

use anyhow::Result;
use common::{Keys, TestApp, IMAGE_KEY, TOPIC_KEY, VIDEO_KEY};
use pdfinsight_test_utils::helpers::generate_test_pdf;
use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, ResponseTemplate,
};

fn three_page_pdf() -> Result<Vec<u8>> {
    generate_test_pdf(&[
        "Photosynthesis converts light into chemical energy.",
        "Chlorophyll absorbs red and blue light.",
        "The Calvin cycle fixes carbon dioxide.",
    ])
}

#[tokio::test]
async fn test_root_and_health() -> Result<()> {
    let app = TestApp::spawn().await?;

    let health = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await?;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await?, "OK");

    let root = app.client.get(&app.address).send().await?;
    assert_eq!(root.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_upload_reports_name_and_size() -> Result<()> {
    let app = TestApp::spawn().await?;
    let pdf = three_page_pdf()?;
    let size = pdf.len();
    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(pdf).file_name("notes.pdf"),
    );

    let response = app
        .client
        .post(format!("{}/upload-pdf", app.address))
        .multipart(form)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "PDF uploaded successfully");
    assert_eq!(body["fileName"], "notes.pdf");
    assert_eq!(body["fileSize"], size);
    Ok(())
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;
    let form = multipart::Form::new().text("note", "no file here");

    let response = app
        .client
        .post(format!("{}/upload-pdf", app.address))
        .multipart(form)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "No file provided");
    Ok(())
}

#[tokio::test]
async fn test_process_without_file_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;
    let form = multipart::Form::new()
        .text("startPage", "1")
        .text("pageCount", "10")
        .text("type", "videos");

    let response = app
        .client
        .post(format!("{}/process-pdf", app.address))
        .multipart(form)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "No file provided");
    Ok(())
}

#[tokio::test]
async fn test_process_with_unknown_type_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.process_pdf(three_page_pdf()?, "1", "1", "audio").await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_process_videos_window() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    app.mock_embeddings().await;
    app.mock_chat(TOPIC_KEY, "```json\n[\"Photosynthesis\", \"Chlorophyll\"]\n```")
        .await;
    app.mock_chat(VIDEO_KEY, r#"["photosynthesis explained", "chlorophyll"]"#)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("key", "yt-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": { "videoId": "v1" },
                "snippet": {
                    "title": "Photosynthesis",
                    "channelTitle": "Bio",
                    "thumbnails": { "medium": { "url": "https://img/v1.jpg" } }
                }
            }]
        })))
        .expect(2)
        .mount(&app.mock_server)
        .await;

    // --- 2. Act ---
    let response = app.process_pdf(three_page_pdf()?, "1", "2", "videos").await?;

    // --- 3. Assert ---
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "PDF processed successfully");
    assert_eq!(body["pageRange"], "1-2");
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["topics"], json!(["Photosynthesis", "Chlorophyll"]));
    assert_eq!(
        body["recommendations"],
        json!(["photosynthesis explained", "chlorophyll"])
    );
    assert_eq!(body["results"][0][0]["id"], "v1");
    assert_eq!(body["results"][1][0]["thumbnail"], "https://img/v1.jpg");

    // The window embedding is searchable afterwards.
    let search = app
        .client
        .post(format!("{}/search/pages", app.address))
        .json(&json!({ "query": "light energy" }))
        .send()
        .await?;
    assert_eq!(search.status(), StatusCode::OK);
    let matches: Value = search.json().await?;
    assert_eq!(matches[0]["id"], "pdf-1-2");
    assert_eq!(matches[0]["metadata"]["fileName"], "biology.pdf");
    Ok(())
}

#[tokio::test]
async fn test_process_pics_window_defaults_bad_page_fields() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_embeddings().await;
    app.mock_chat(TOPIC_KEY, r#"["Photosynthesis"]"#).await;
    app.mock_chat(IMAGE_KEY, r#"["leaf cross section"]"#).await;

    let response = app.process_pdf(three_page_pdf()?, "abc", "0", "pics").await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["pageRange"], "1");
    assert_eq!(body["recommendations"], json!(["leaf cross section"]));
    assert!(body.get("results").is_none());
    Ok(())
}

#[tokio::test]
async fn test_process_gifs_window_with_partial_failure() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_embeddings().await;
    app.mock_chat(TOPIC_KEY, r#"["Photosynthesis", "Chlorophyll"]"#).await;
    app.mock_chat(IMAGE_KEY, r#"["sunlight leaf", "green pigment"]"#).await;
    Mock::given(method("GET"))
        .and(path("/v1/gifs/search"))
        .and(query_param("q", "sunlight leaf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "g1",
                "title": "sunny",
                "images": {
                    "original": { "url": "https://giphy/g1.gif" },
                    "fixed_height": { "url": "https://giphy/g1-200.gif" }
                }
            }]
        })))
        .mount(&app.mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/gifs/search"))
        .and(query_param("q", "green pigment"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.mock_server)
        .await;

    let response = app.process_pdf(three_page_pdf()?, "1", "3", "gifs").await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["results"][0][0]["url"], "https://giphy/g1.gif");
    assert_eq!(body["results"][1], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_process_without_search_key_fails() -> Result<()> {
    let app = TestApp::spawn_with_keys(Keys {
        youtube: false,
        ..Keys::default()
    })
    .await?;
    app.mock_embeddings().await;
    app.mock_chat(TOPIC_KEY, r#"["Photosynthesis"]"#).await;
    app.mock_chat(VIDEO_KEY, r#"["photosynthesis explained"]"#).await;

    let response = app.process_pdf(three_page_pdf()?, "1", "1", "videos").await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.contains("YouTube"), "unexpected error: {message}");
    Ok(())
}

#[tokio::test]
async fn test_missing_model_key_still_allows_upload() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn_with_keys(Keys {
        model: false,
        ..Keys::default()
    })
    .await?;
    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(three_page_pdf()?).file_name("notes.pdf"),
    );

    // --- 2. Act ---
    let upload = app
        .client
        .post(format!("{}/upload-pdf", app.address))
        .multipart(form)
        .send()
        .await?;
    let process = app.process_pdf(three_page_pdf()?, "1", "2", "videos").await?;

    // --- 3. Assert ---
    assert_eq!(upload.status(), StatusCode::OK);
    assert_eq!(process.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = process.json().await?;
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.contains("not configured"), "unexpected error: {message}");

    let received = app.mock_server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty(), "no external call expected, got {}", received.len());
    Ok(())
}

#[tokio::test]
async fn test_process_corrupt_document_fails() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .process_pdf(b"not a pdf".to_vec(), "1", "1", "pics")
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("Failed to extract text"));
    Ok(())
}

#[tokio::test]
async fn test_search_pages_rejects_empty_query() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .post(format!("{}/search/pages", app.address))
        .json(&json!({ "query": "  " }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

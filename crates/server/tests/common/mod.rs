//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port. Every external service
//! (model, embeddings, YouTube, GIPHY) points at one `wiremock::MockServer`,
//! and the vector store is the in-memory one.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use pdfinsight_server::{
    config, router,
    state::{build_app_state, AppState},
};
use reqwest::{multipart, Client};
use serde_json::json;
use std::{fs::File, io::Write, net::SocketAddr};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TOPIC_KEY: &str = "most important topics";
pub const VIDEO_KEY: &str = "Generate YouTube search queries";
pub const IMAGE_KEY: &str = "Generate image search queries";

/// Which API keys the spawned app is configured with.
///
/// With `model: false` the generation provider is Gemini with an empty key.
pub struct Keys {
    pub model: bool,
    pub youtube: bool,
    pub giphy: bool,
}

impl Default for Keys {
    fn default() -> Self {
        Self {
            model: true,
            youtube: true,
            giphy: true,
        }
    }
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server with both search keys configured.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_keys(Keys::default()).await
    }

    pub async fn spawn_with_keys(keys: Keys) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start().await;
        let uri = mock_server.uri();

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let youtube_key = if keys.youtube { "yt-test-key" } else { "" };
        let giphy_key = if keys.giphy { "gif-test-key" } else { "" };
        let generation = if keys.model {
            format!(
                r#"  provider: "local"
  api_url: "{uri}/v1/chat/completions"
  model_name: "mock-chat-model""#
            )
        } else {
            format!(
                r#"  provider: "gemini"
  api_url: "{uri}/v1beta/models/gemini-2.0-flash:generateContent"
  api_key: ""
  model_name: "gemini-2.0-flash""#
            )
        };
        let config_content = format!(
            r#"
port: 0
generation:
{generation}
embedding:
  provider: "local"
  api_url: "{uri}/v1/embeddings"
  model_name: "mock-embedding-model"
vector_store:
  provider: "memory"
youtube:
  api_url: "{uri}/youtube/v3/search"
  api_key: "{youtube_key}"
giphy:
  api_url: "{uri}/v1/gifs/search"
  api_key: "{giphy_key}"
"#
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config_path = config_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("temp config path is not UTF-8"))?;
        let config = config::get_config(Some(config_path))?;
        let app_state = build_app_state(config)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let router_state = app_state.clone();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(router_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Programs the chat endpoint to answer prompts containing `key`.
    pub async fn mock_chat(&self, key: &str, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains(key))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": content } }]
            })))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_embeddings(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "embedding": [0.1, 0.2, 0.3], "index": 0 }]
            })))
            .mount(&self.mock_server)
            .await;
    }

    /// Posts a document window to `/process-pdf`.
    pub async fn process_pdf(
        &self,
        pdf: Vec<u8>,
        start_page: &str,
        page_count: &str,
        recommendation_type: &str,
    ) -> Result<reqwest::Response> {
        let form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(pdf)
                    .file_name("biology.pdf")
                    .mime_str("application/pdf")?,
            )
            .text("startPage", start_page.to_string())
            .text("pageCount", page_count.to_string())
            .text("type", recommendation_type.to_string());
        Ok(self
            .client
            .post(format!("{}/process-pdf", self.address))
            .multipart(form)
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

use pdfinsight::errors::PromptError;
use pdfinsight::providers::ai::{AiProvider, EmbeddingProvider};
use pdfinsight::{DocumentWindow, ExtractedText, InsightError, TextExtractor};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    failures: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the system prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Makes every call whose system prompt contains `key` fail.
    pub fn add_failure(&self, key: &str) {
        self.failures.lock().unwrap().push(key.to_string());
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if self
            .failures
            .lock()
            .unwrap()
            .iter()
            .any(|key| system_prompt.contains(key))
        {
            return Err(PromptError::AiApi(
                "MockAiProvider: programmed failure".to_string(),
            ));
        }

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if system_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(PromptError::AiApi(format!(
            "MockAiProvider: No response programmed for system prompt. Got: '{system_prompt}'"
        )))
    }
}

// --- Mock Embedding Provider ---

/// Returns a fixed vector and records every embedded text.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    vector: Vec<f32>,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl MockEmbeddingProvider {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new(vec![0.1, 0.2, 0.3])
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PromptError> {
        self.inputs.lock().unwrap().push(text.to_string());
        Ok(self.vector.clone())
    }
}

// --- Stub Extractor ---

/// Serves canned page texts instead of parsing PDF bytes.
#[derive(Clone, Debug)]
pub struct StubExtractor {
    pages: Vec<String>,
    fail: bool,
    windows: Arc<Mutex<Vec<DocumentWindow>>>,
}

impl StubExtractor {
    pub fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            fail: false,
            windows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An extractor that rejects every document as unparseable.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[])
        }
    }

    /// The windows requested so far, in order.
    pub fn get_windows(&self) -> Vec<DocumentWindow> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextExtractor for StubExtractor {
    async fn extract(
        &self,
        _document: &[u8],
        window: DocumentWindow,
    ) -> Result<ExtractedText, InsightError> {
        self.windows.lock().unwrap().push(window);
        if self.fail {
            return Err(InsightError::Extraction(
                "StubExtractor: not a PDF".to_string(),
            ));
        }
        let text = self
            .pages
            .iter()
            .enumerate()
            .filter(|(index, _)| window.contains(*index as u32 + 1))
            .map(|(_, page)| format!("{page} "))
            .collect();
        Ok(ExtractedText {
            text,
            total_pages: self.pages.len() as u32,
        })
    }
}

// --- Test-Specific Helpers ---
pub mod helpers {
    use anyhow::Result;
    use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

    /// Generates a PDF with one page per entry, each showing its text in Helvetica.
    pub fn generate_test_pdf(pages: &[&str]) -> Result<Vec<u8>> {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let font_name = Name(b"F1");

        // Each page takes two ids: the page object and its content stream.
        let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32)
            .map(|i| (Ref::new(4 + i * 2), Ref::new(5 + i * 2)))
            .collect();

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(pages.len() as i32);
        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        for ((page_id, content_id), text) in page_ids.iter().zip(pages) {
            let mut page = pdf.page(*page_id);
            page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
            page.parent(page_tree_id);
            page.contents(*content_id);
            page.resources().fonts().pair(font_name, font_id);
            page.finish();

            let mut content = Content::new();
            content.begin_text();
            content.set_font(font_name, 14.0);
            content.next_line(108.0, 734.0);
            content.show(Str(text.as_bytes()));
            content.end_text();
            pdf.stream(*content_id, &content.finish());
        }

        Ok(pdf.finish())
    }
}

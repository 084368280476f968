//! # pdfinsight-pdf: PDF Text Extraction
//!
//! Implements the `TextExtractor` trait from `pdfinsight` on top of the `pdf`
//! crate. Only the pages inside the requested window are decoded.

use async_trait::async_trait;
use pdf::content::{Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use pdfinsight::{DocumentWindow, ExtractedText, InsightError, TextExtractor};
use thiserror::Error;
use tracing::{debug, info, instrument};

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum PdfExtractError {
    #[error("Failed to parse PDF content: {0}")]
    PdfParse(String),
    #[error("PDF extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<PdfExtractError> for InsightError {
    fn from(err: PdfExtractError) -> Self {
        InsightError::Extraction(err.to_string())
    }
}

// --- Core Extraction Logic ---

/// Extracts the text of the pages in `window` synchronously.
///
/// Every text-show operator contributes its string followed by a single space.
/// Pages are joined with no separator. A window that starts after the last
/// page yields empty text.
pub fn extract_window_text(
    pdf_data: Vec<u8>,
    window: DocumentWindow,
) -> Result<ExtractedText, PdfExtractError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
    let resolver = file.resolver();
    let total_pages = file.num_pages();
    let last_page = window.end_page().min(total_pages);
    let mut text = String::new();

    // `get_page` is 0-based; windows are 1-based.
    for page_number in window.start_page()..=last_page {
        let page = file
            .get_page(page_number - 1)
            .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
        let Some(content) = &page.contents else {
            debug!("Page {page_number} has no content stream.");
            continue;
        };
        let operations = content
            .operations(&resolver)
            .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
        for op in operations.iter() {
            match op {
                Op::TextDraw { text: drawn } => {
                    text.push_str(&drawn.to_string_lossy());
                    text.push(' ');
                }
                Op::TextDrawAdjusted { array } => {
                    for part in array {
                        if let TextDrawAdjusted::Text(drawn) = part {
                            text.push_str(&drawn.to_string_lossy());
                            text.push(' ');
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(ExtractedText { text, total_pages })
}

/// A `TextExtractor` backed by the `pdf` crate. Parsing runs on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    #[instrument(skip(self, document), fields(bytes = document.len()))]
    async fn extract(
        &self,
        document: &[u8],
        window: DocumentWindow,
    ) -> Result<ExtractedText, InsightError> {
        let pdf_data = document.to_vec();
        let extracted =
            tokio::task::spawn_blocking(move || extract_window_text(pdf_data, window))
                .await
                .map_err(PdfExtractError::from)??;
        info!(
            "Extracted {} characters from pages {} of {}.",
            extracted.text.len(),
            window.page_range(),
            extracted.total_pages
        );
        Ok(extracted)
    }
}

//! # Window Processing Handler
//!
//! `POST /process-pdf` runs one window of an uploaded document through the
//! pipeline. The client re-sends the document with every window.

use super::{AppError, AppState};
use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use pdfinsight::{DocumentWindow, Modality, SourceDocument, WindowResults};
use serde::Serialize;
use tracing::info;

#[derive(Serialize, Debug)]
pub struct ProcessPdfResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub window: WindowResults,
}

/// Reads a page number form field.
///
/// Leading digits are used and anything after them ignored. A missing,
/// non-numeric or zero value becomes 1.
pub fn parse_page_field(value: Option<&str>) -> u32 {
    let digits: String = value
        .unwrap_or_default()
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().ok().filter(|n| *n > 0).unwrap_or(1)
}

/// Handler for `POST /process-pdf`.
pub async fn process_pdf_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessPdfResponse>, AppError> {
    let mut document: Option<SourceDocument> = None;
    let mut start_page: Option<String> = None;
    let mut page_count: Option<String> = None;
    let mut recommendation_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(anyhow::Error::from)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("uploaded_file.pdf").to_string();
                let bytes = field.bytes().await.map_err(anyhow::Error::from)?;
                document = Some(SourceDocument::new(file_name, bytes.to_vec()));
            }
            "startPage" => start_page = Some(field.text().await.map_err(anyhow::Error::from)?),
            "pageCount" => page_count = Some(field.text().await.map_err(anyhow::Error::from)?),
            "type" => {
                recommendation_type = Some(field.text().await.map_err(anyhow::Error::from)?)
            }
            _ => {}
        }
    }

    let document = document.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let raw_type = recommendation_type.unwrap_or_default();
    let modality: Modality = raw_type.parse().map_err(|_| {
        AppError::BadRequest(format!(
            "Unsupported recommendation type '{raw_type}'. Expected 'videos', 'pics' or 'gifs'."
        ))
    })?;
    let window = DocumentWindow::new(
        parse_page_field(start_page.as_deref()),
        parse_page_field(page_count.as_deref()),
    )?;

    info!(
        "Processing '{}' pages {} for {modality}.",
        document.file_name,
        window.page_range()
    );
    let results = app_state
        .pipeline
        .process_window(&document, window, modality)
        .await?;

    Ok(Json(ProcessPdfResponse {
        message: "PDF processed successfully",
        window: results,
    }))
}

#[cfg(test)]
mod tests {
    use super::parse_page_field;

    #[test]
    fn test_parse_page_field() {
        assert_eq!(parse_page_field(Some("11")), 11);
        assert_eq!(parse_page_field(Some(" 7 ")), 7);
        assert_eq!(parse_page_field(Some("12abc")), 12);
        assert_eq!(parse_page_field(Some("abc")), 1);
        assert_eq!(parse_page_field(Some("0")), 1);
        assert_eq!(parse_page_field(Some("-3")), 1);
        assert_eq!(parse_page_field(None), 1);
    }
}

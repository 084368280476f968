//! # Upload Handler
//!
//! Accepts a document and reports its name and size. Nothing is stored.

use super::AppError;
use axum::Json;
use axum_extra::extract::Multipart;
use serde::Serialize;
use tracing::info;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadPdfResponse {
    pub message: &'static str,
    pub file_name: String,
    pub file_size: usize,
}

/// Handler for `POST /upload-pdf`.
pub async fn upload_pdf_handler(
    mut multipart: Multipart,
) -> Result<Json<UploadPdfResponse>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(anyhow::Error::from)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("uploaded_file.pdf").to_string();
        let bytes = field.bytes().await.map_err(anyhow::Error::from)?;
        info!("Received upload '{}' ({} bytes).", file_name, bytes.len());
        return Ok(Json(UploadPdfResponse {
            message: "PDF uploaded successfully",
            file_name,
            file_size: bytes.len(),
        }));
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}

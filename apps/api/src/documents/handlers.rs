//! Axum route handler for `POST /api/process-pdf`.
//!
//! PDF text extraction is not performed. A valid upload is answered with an
//! instructional placeholder asking the user to paste the offer text, and the
//! response is flagged `requiresManualInput`. The placeholder always fails the
//! analysis input check, so it can never be analyzed by accident.

use axum::{extract::rejection::JsonRejection, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::documents::upload::{
    check_content_length, decode_file_data, upload_payload, NO_FILE_DATA_MESSAGE,
};
use crate::errors::AppError;

const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPdfRequest {
    pub file_data: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PdfInfo {
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPdfResponse {
    pub text: String,
    pub pages: u32,
    pub info: PdfInfo,
    pub requires_manual_input: bool,
}

/// The text returned in place of extracted PDF content.
pub fn manual_input_placeholder(file_name: &str) -> String {
    format!(
        "PDF file \"{file_name}\" received successfully. However, PDF text extraction is \
         currently being improved. Please copy and paste the text content from your PDF \
         into the text area above for the best experience."
    )
}

/// POST /api/process-pdf
pub async fn handle_process_pdf(
    headers: HeaderMap,
    payload: Result<Json<ProcessPdfRequest>, JsonRejection>,
) -> Result<Json<ProcessPdfResponse>, AppError> {
    check_content_length(&headers)?;
    let request = upload_payload(payload)?;

    if request.file_data.as_deref().map_or(true, |d| d.trim().is_empty()) {
        return Err(AppError::Validation(NO_FILE_DATA_MESSAGE.to_string()));
    }
    if request.file_type.as_deref() != Some(PDF_MIME_TYPE) {
        return Err(AppError::Validation("Only PDF files are supported".to_string()));
    }
    let bytes = decode_file_data(request.file_data.as_deref())?;

    let file_name = request
        .file_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "document.pdf".to_string());

    info!(
        "Received PDF '{}' ({} bytes); manual text input required",
        file_name,
        bytes.len()
    );

    Ok(Json(ProcessPdfResponse {
        text: manual_input_placeholder(&file_name),
        pages: 1,
        info: PdfInfo { title: file_name },
        requires_manual_input: true,
    }))
}

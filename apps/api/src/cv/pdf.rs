use bytes::Bytes;

use crate::errors::AppError;

/// Pulls plain text out of an uploaded PDF.
///
/// Extraction is CPU-bound and `pdf-extract` may panic on malformed input, so
/// it runs on the blocking pool and a panicked task is reported like any other
/// unreadable file. Empty output is an error.
pub async fn extract_text(data: Bytes) -> Result<String, AppError> {
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| pdf_error(format!("extraction aborted: {e}")))?
        .map_err(|e| pdf_error(e.to_string()))?;

    let text = extracted.trim();
    if text.is_empty() {
        return Err(pdf_error("No text could be extracted from the PDF"));
    }
    Ok(text.to_string())
}

fn pdf_error(reason: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("Error processing PDF: {reason}"))
}

//! Text extraction from uploaded resume PDFs.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::analysis::upload::UploadedDocument;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document is not a readable PDF: {0}")]
    Unreadable(String),

    #[error("document has no extractable text layer")]
    NoTextLayer,

    #[error("PDF extraction timed out")]
    TimedOut,
}

/// Produces the plain text of an uploaded document, pages in document order.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError>;
}

/// `pdf-extract` backed extractor. Parsing runs on the blocking pool; a panic
/// inside the parser is reported as an unreadable document.
#[derive(Debug, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    #[tracing::instrument(skip_all, fields(size = document.size(), file_name = ?document.file_name()))]
    async fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        let path = document.path().to_path_buf();

        let text = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path)),
        )
        .await
        .map_err(|_| ExtractionError::TimedOut)?
        .map_err(|e| ExtractionError::Unreadable(format!("PDF parser aborted: {e}")))?
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

        tracing::info!(chars = text.chars().count(), "PDF text extraction complete");
        Ok(text)
    }
}

/// Rejects text that is empty once whitespace is ignored (image-only scans).
pub fn require_text(text: String) -> Result<String, ExtractionError> {
    if text.trim().is_empty() {
        Err(ExtractionError::NoTextLayer)
    } else {
        Ok(text)
    }
}

//! Source-document text extraction collaborators.
//!
//! The core pipeline only ever sees text; decoding bytes is delegated to a
//! [`TextExtractor`] implementation chosen by the caller.

use crate::types::PipelineError;

/// Decodes raw source bytes into text.
pub trait TextExtractor: Send + Sync {
    /// # Errors
    ///
    /// [`PipelineError::Extraction`] when the input is malformed or contains
    /// no extractable text.
    fn extract(&self, bytes: &[u8]) -> Result<String, PipelineError>;
}

/// PDF text extraction backed by the `pdf-extract` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, PipelineError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|err| PipelineError::Extraction(err.to_string()))?;
        if text.trim().is_empty() {
            return Err(PipelineError::Extraction(
                "no text extracted (PDF may be scanned or blank)".to_string(),
            ));
        }
        Ok(text)
    }
}

/// UTF-8 plain-text extraction, tolerant of a leading BOM.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, PipelineError> {
        let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
        let text = std::str::from_utf8(bytes)
            .map_err(|err| PipelineError::Extraction(format!("invalid UTF-8: {err}")))?;
        Ok(text.to_string())
    }
}

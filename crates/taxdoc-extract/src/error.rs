use thiserror::Error;

/// Extraction errors
///
/// These never cross the crate boundary as `Err`; [`TextExtractor`](crate::TextExtractor)
/// folds them into the `error` marker of the extracted text.
#[derive(Error, Debug, Clone)]
pub enum ExtractionError {
    /// PDF parsing failed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Encoding issues (Identity-H without ToUnicode, etc.)
    #[error("Encoding failure: {details}")]
    EncodingFailure { details: String, recoverable: bool },

    /// Text extraction produced garbage output
    #[error("Garbage output detected ({details})")]
    GarbageOutput { details: String },

    /// Backend not available
    #[error("Backend '{0}' not available")]
    BackendUnavailable(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
}

impl ExtractionError {
    /// Whether a scan/OCR pass could still recover text from this file
    pub fn suggests_ocr(&self) -> bool {
        match self {
            ExtractionError::EncodingFailure { recoverable, .. } => *recoverable,
            ExtractionError::GarbageOutput { .. } => true,
            ExtractionError::BackendUnavailable(_) => true,
            ExtractionError::ParseError(_) | ExtractionError::UnsupportedType(_) => false,
        }
    }
}

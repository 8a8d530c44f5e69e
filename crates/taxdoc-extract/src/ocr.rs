//! OCR seam for image uploads

use crate::error::ExtractionError;

/// Recognizes text in an image.
///
/// Implementations are expected to be CPU-bound and synchronous; callers that
/// want concurrency run them on a blocking pool.
pub trait OcrEngine: Send + Sync {
    /// Engine identifier
    fn name(&self) -> &'static str;

    fn recognize(&self, image: &[u8], mime_type: &str) -> Result<String, ExtractionError>;
}

/// Default engine: no OCR available, every image is marked `requires_ocr`
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledOcr;

impl OcrEngine for DisabledOcr {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn recognize(&self, _image: &[u8], _mime_type: &str) -> Result<String, ExtractionError> {
        Err(ExtractionError::BackendUnavailable("ocr".to_string()))
    }
}

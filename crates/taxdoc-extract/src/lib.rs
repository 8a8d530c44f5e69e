//! Text extraction for uploaded tax documents
//!
//! Turns a [`RawDocument`](taxdoc_types::RawDocument) into
//! [`ExtractedText`](taxdoc_types::ExtractedText):
//! - PDF: text layer via pdf-extract, lopdf page-by-page as fallback
//! - Images: pluggable [`OcrEngine`]
//! - Plain text: direct (lossy UTF-8) read
//!
//! Extraction never returns an error to the caller. Failures are recorded on
//! the result (`requires_ocr`, `error`) so the upload flow can ask for a
//! better file.

pub mod error;
pub mod extractor;
pub mod ocr;
pub mod pdf;
pub mod quality;
pub mod upload;

pub use error::ExtractionError;
pub use extractor::TextExtractor;
pub use ocr::{DisabledOcr, OcrEngine};
pub use quality::{analyze_text_quality, TextQuality};
pub use upload::{validate_upload, UploadLimits};

//! PDF text-layer backends
//!
//! - Legacy: pdf-extract (fastest, handles most simple PDFs)
//! - Native: lopdf page-by-page extraction, used when legacy fails or its
//!   output does not pass the quality check

use crate::error::ExtractionError;
use crate::quality::analyze_text_quality;
use lopdf::Document;
use tracing::debug;

/// Trait for PDF extraction backends
pub trait PdfBackend {
    /// Backend identifier
    fn name(&self) -> &'static str;

    /// Check if this backend can likely handle the PDF
    fn can_handle(&self, data: &[u8]) -> bool {
        is_pdf(data)
    }

    /// Per-page text
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Text of a PDF together with the backend that produced it
#[derive(Debug, Clone)]
pub struct PdfText {
    pub pages: Vec<String>,
    pub backend: &'static str,
    pub fallback_occurred: bool,
}

impl PdfText {
    pub fn joined(&self) -> String {
        self.pages.join("\n\n")
    }
}

pub fn is_pdf(data: &[u8]) -> bool {
    data.len() > 4 && &data[0..4] == b"%PDF"
}

/// Backend using pdf-extract
#[derive(Debug, Default)]
pub struct LegacyExtractor;

impl PdfBackend for LegacyExtractor {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let text = pdf_extract::extract_text_from_mem(data).map_err(|e| {
            let error_str = e.to_string();

            // Known encoding failures can still be recovered by the native backend or OCR
            if error_str.contains("Identity-H") || error_str.contains("Unimplemented") {
                ExtractionError::EncodingFailure {
                    details: error_str,
                    recoverable: true,
                }
            } else {
                ExtractionError::ParseError(error_str)
            }
        })?;

        // pdf-extract separates pages with form feeds
        Ok(text.split('\x0C').map(str::to_string).collect())
    }
}

/// Backend using lopdf
#[derive(Debug, Default)]
pub struct NativeExtractor;

impl PdfBackend for NativeExtractor {
    fn name(&self) -> &'static str {
        "native"
    }

    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let doc =
            Document::load_mem(data).map_err(|e| ExtractionError::ParseError(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(ExtractionError::EncodingFailure {
                details: "PDF is encrypted".to_string(),
                recoverable: false,
            });
        }

        let mut pages = Vec::new();
        for page_num in doc.get_pages().keys() {
            // A page without a decodable text layer is left empty rather than failing the file
            let text = doc.extract_text(&[*page_num]).unwrap_or_default();
            pages.push(text);
        }
        Ok(pages)
    }
}

/// Extract the text layer, falling back from legacy to native.
///
/// Returns `GarbageOutput` when neither backend produced usable text, which
/// callers treat as "scanned PDF, needs OCR".
pub fn extract_pdf_text(data: &[u8]) -> Result<PdfText, ExtractionError> {
    if !is_pdf(data) {
        return Err(ExtractionError::ParseError(
            "Missing %PDF header".to_string(),
        ));
    }

    let backends: [&dyn PdfBackend; 2] = [&LegacyExtractor, &NativeExtractor];
    let mut last_error = None;

    for (attempt, backend) in backends.iter().enumerate() {
        if !backend.can_handle(data) {
            continue;
        }
        match backend.extract_pages(data) {
            Ok(pages) => {
                let quality = analyze_text_quality(&pages.concat());
                if quality.is_valid {
                    debug!(backend = backend.name(), pages = pages.len(), "PDF text layer extracted");
                    return Ok(PdfText {
                        pages,
                        backend: backend.name(),
                        fallback_occurred: attempt > 0,
                    });
                }
                debug!(backend = backend.name(), details = %quality.details, "Rejected PDF text layer");
                last_error = Some(ExtractionError::GarbageOutput {
                    details: quality.details,
                });
            }
            Err(e) => {
                debug!(backend = backend.name(), error = %e, "PDF backend failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ExtractionError::BackendUnavailable("pdf".to_string())))
}

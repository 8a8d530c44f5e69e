use crate::error::ExtractionError;
use crate::ocr::{DisabledOcr, OcrEngine};
use crate::pdf::extract_pdf_text;
use crate::quality::analyze_text_quality;
use crate::upload::{normalize_mime, IMAGE_MIME_TYPES, PDF_MIME_TYPES, TEXT_MIME_TYPES};
use taxdoc_types::{ExtractedText, ExtractionMethod, RawDocument};
use tracing::{debug, warn};

/// Obtains raw text from an uploaded document, routing on MIME type
pub struct TextExtractor {
    ocr: Box<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self::with_ocr(Box::new(DisabledOcr))
    }

    pub fn with_ocr(ocr: Box<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    pub fn ocr_engine(&self) -> &str {
        self.ocr.name()
    }

    /// Extract text. Never fails: problems are recorded on the result.
    pub fn extract(&self, document: &RawDocument) -> ExtractedText {
        let mime = normalize_mime(&document.mime_type);

        let extracted = if PDF_MIME_TYPES.contains(&mime.as_str()) {
            self.extract_pdf(document)
        } else if IMAGE_MIME_TYPES.contains(&mime.as_str()) {
            self.extract_image(document, &mime)
        } else if TEXT_MIME_TYPES.contains(&mime.as_str()) {
            extract_plain(document)
        } else {
            let err = ExtractionError::UnsupportedType(mime.clone());
            ExtractedText::failed(&document.id, ExtractionMethod::Plain, err.to_string())
        };

        if let Some(error) = &extracted.error {
            warn!(
                document = %document.name,
                requires_ocr = extracted.requires_ocr,
                error = %error,
                "No text extracted"
            );
        } else {
            debug!(
                document = %document.name,
                method = ?extracted.extraction_method,
                chars = extracted.text.len(),
                "Text extracted"
            );
        }

        extracted
    }

    fn extract_pdf(&self, document: &RawDocument) -> ExtractedText {
        match extract_pdf_text(&document.source_bytes) {
            Ok(pdf) => {
                let mut extracted =
                    ExtractedText::new(&document.id, ExtractionMethod::PdfText, pdf.joined());
                if pdf.fallback_occurred {
                    extracted.add_warning(format!(
                        "Primary PDF backend failed, text from '{}' backend",
                        pdf.backend
                    ));
                }
                extracted
            }
            Err(e) => {
                // Scanned PDFs have no text layer; rasterizing them is left to the caller
                let requires_ocr = e.suggests_ocr();
                ExtractedText::failed(&document.id, ExtractionMethod::PdfText, e.to_string())
                    .with_requires_ocr(requires_ocr)
            }
        }
    }

    fn extract_image(&self, document: &RawDocument, mime: &str) -> ExtractedText {
        match self.ocr.recognize(&document.source_bytes, mime) {
            Ok(text) => {
                let quality = analyze_text_quality(&text);
                let mut extracted = ExtractedText::new(&document.id, ExtractionMethod::Ocr, text);
                if !quality.is_valid {
                    extracted.add_warning(format!("Low quality OCR output: {}", quality.details));
                }
                extracted
            }
            Err(e) => ExtractedText::failed(&document.id, ExtractionMethod::Ocr, e.to_string())
                .with_requires_ocr(true),
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_plain(document: &RawDocument) -> ExtractedText {
    let text = String::from_utf8_lossy(&document.source_bytes).into_owned();
    let mut extracted = ExtractedText::new(&document.id, ExtractionMethod::Plain, text);
    if extracted.text.contains('\u{FFFD}') {
        extracted.add_warning("File is not valid UTF-8; invalid bytes replaced".to_string());
    }
    extracted
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOcr(&'static str);

    impl OcrEngine for FixedOcr {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn recognize(&self, _image: &[u8], _mime_type: &str) -> Result<String, ExtractionError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_plain_text_read_directly() {
        let doc = RawDocument::new("w2.txt", "text/plain", b"Wages, tips $45,000".to_vec());
        let extracted = TextExtractor::new().extract(&doc);
        assert_eq!(extracted.extraction_method, ExtractionMethod::Plain);
        assert_eq!(extracted.text, "Wages, tips $45,000");
        assert_eq!(extracted.document_id, doc.id);
        assert!(extracted.error.is_none());
    }

    #[test]
    fn test_image_without_ocr_requires_ocr() {
        let doc = RawDocument::new("scan.png", "image/png", vec![0x89, b'P', b'N', b'G']);
        let extracted = TextExtractor::new().extract(&doc);
        assert_eq!(extracted.extraction_method, ExtractionMethod::Ocr);
        assert!(extracted.requires_ocr);
        assert!(extracted.is_empty());
        assert!(extracted.error.is_some());
    }

    #[test]
    fn test_image_with_ocr_engine() {
        let extractor = TextExtractor::with_ocr(Box::new(FixedOcr("Form 1099-INT Interest income")));
        let doc = RawDocument::new("scan.jpg", "image/jpeg", vec![0xFF, 0xD8]);
        let extracted = extractor.extract(&doc);
        assert_eq!(extractor.ocr_engine(), "fixed");
        assert_eq!(extracted.text, "Form 1099-INT Interest income");
        assert!(!extracted.requires_ocr);
    }

    #[test]
    fn test_invalid_pdf_is_a_marker_not_a_panic() {
        let doc = RawDocument::new("broken.pdf", "application/pdf", b"not really a pdf".to_vec());
        let extracted = TextExtractor::new().extract(&doc);
        assert!(extracted.is_empty());
        assert!(extracted.error.is_some());
        assert!(!extracted.requires_ocr);
    }

    #[test]
    fn test_unsupported_type_marker() {
        let doc = RawDocument::new("a.zip", "application/zip", vec![1, 2, 3]);
        let extracted = TextExtractor::new().extract(&doc);
        assert!(extracted
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("Unsupported"));
    }

    #[test]
    fn test_invalid_utf8_warns() {
        let doc = RawDocument::new("a.txt", "text/plain", vec![b'o', b'k', 0xFF]);
        let extracted = TextExtractor::new().extract(&doc);
        assert_eq!(extracted.warnings.len(), 1);
    }
}

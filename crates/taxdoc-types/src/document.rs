//! Uploaded documents and the text obtained from them

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An uploaded file. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    /// Hex SHA-256 of `source_bytes`
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub byte_size: usize,
    #[serde(skip)]
    pub source_bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(name: &str, mime_type: &str, source_bytes: Vec<u8>) -> Self {
        Self {
            id: hash_document(&source_bytes),
            name: name.to_string(),
            mime_type: mime_type.to_ascii_lowercase(),
            byte_size: source_bytes.len(),
            source_bytes,
        }
    }

    pub fn meta(&self) -> DocumentMeta {
        DocumentMeta {
            id: self.id.clone(),
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Identifying data of a document, without its bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

/// How the text of a document was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    PdfText,
    Ocr,
    Plain,
}

/// Text derived from a [`RawDocument`].
///
/// Extraction never fails loudly: an empty `text` together with
/// `requires_ocr` and/or `error` tells the caller to prompt for a re-upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub document_id: String,
    pub text: String,
    pub extraction_method: ExtractionMethod,
    #[serde(default)]
    pub requires_ocr: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ExtractedText {
    pub fn new(document_id: &str, method: ExtractionMethod, text: String) -> Self {
        Self {
            document_id: document_id.to_string(),
            text,
            extraction_method: method,
            requires_ocr: false,
            error: None,
            warnings: Vec::new(),
        }
    }

    /// An extraction that produced no usable text
    pub fn failed(document_id: &str, method: ExtractionMethod, error: String) -> Self {
        Self {
            document_id: document_id.to_string(),
            text: String::new(),
            extraction_method: method,
            requires_ocr: false,
            error: Some(error),
            warnings: Vec::new(),
        }
    }

    pub fn with_requires_ocr(mut self, requires_ocr: bool) -> Self {
        self.requires_ocr = requires_ocr;
        self
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// True when no text was obtained
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Compute SHA-256 hash of document bytes
pub fn hash_document(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_bytes_share_an_id() {
        let a = RawDocument::new("w2.pdf", "application/pdf", b"%PDF-1.4 same".to_vec());
        let b = RawDocument::new("copy.pdf", "application/pdf", b"%PDF-1.4 same".to_vec());
        assert_eq!(a.id, b.id);
        assert_eq!(a.byte_size, 13);
    }

    #[test]
    fn test_mime_type_is_lowercased() {
        let doc = RawDocument::new("scan.PNG", "Image/PNG", vec![1, 2, 3]);
        assert_eq!(doc.mime_type, "image/png");
        assert_eq!(doc.meta().name, "scan.PNG");
    }

    #[test]
    fn test_failed_extraction_is_empty() {
        let extracted = ExtractedText::failed("abc", ExtractionMethod::Ocr, "no engine".into())
            .with_requires_ocr(true);
        assert!(extracted.is_empty());
        assert!(extracted.requires_ocr);
        assert_eq!(extracted.error.as_deref(), Some("no engine"));
    }

    #[test]
    fn test_source_bytes_not_serialized() {
        let doc = RawDocument::new("a.txt", "text/plain", b"wages".to_vec());
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("source_bytes"));
        assert!(json.contains("\"byte_size\":5"));
    }
}

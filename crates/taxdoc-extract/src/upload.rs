//! Upload gate: size and type checks before a file enters the pipeline

use serde::{Deserialize, Serialize};
use taxdoc_types::UploadError;

/// 10 MB
pub const DEFAULT_MAX_BYTES: usize = 10 * 1024 * 1024;

pub const PDF_MIME_TYPES: &[&str] = &["application/pdf"];

pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/tiff",
];

pub const TEXT_MIME_TYPES: &[&str] = &["text/plain", "text/csv"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    pub max_bytes: usize,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        let allowed_mime_types = PDF_MIME_TYPES
            .iter()
            .chain(IMAGE_MIME_TYPES)
            .chain(TEXT_MIME_TYPES)
            .map(|m| m.to_string())
            .collect();
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            allowed_mime_types,
        }
    }
}

impl UploadLimits {
    pub fn allows(&self, mime_type: &str) -> bool {
        let mime = normalize_mime(mime_type);
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&mime))
    }
}

/// Check a file before it is turned into a `RawDocument`
pub fn validate_upload(
    name: &str,
    mime_type: &str,
    bytes: &[u8],
    limits: &UploadLimits,
) -> Result<(), UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty(name.to_string()));
    }
    if bytes.len() > limits.max_bytes {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            limit: limits.max_bytes,
        });
    }
    if !limits.allows(mime_type) {
        return Err(UploadError::UnsupportedType(mime_type.to_string()));
    }
    Ok(())
}

/// Lowercase and drop parameters such as `; charset=utf-8`
pub fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Best-effort MIME type from a file name, for callers that only have a path
pub fn mime_from_file_name(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "txt" | "text" => "text/plain",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accepts_allowed_pdf() {
        let limits = UploadLimits::default();
        assert!(validate_upload("w2.pdf", "application/pdf", b"%PDF-1.4", &limits).is_ok());
    }

    #[test]
    fn test_rejects_oversized_file() {
        let limits = UploadLimits {
            max_bytes: 4,
            ..Default::default()
        };
        let err = validate_upload("big.pdf", "application/pdf", b"%PDF-1.4", &limits).unwrap_err();
        assert_eq!(err, UploadError::TooLarge { size: 8, limit: 4 });
    }

    #[test]
    fn test_rejects_empty_file() {
        let err =
            validate_upload("empty.txt", "text/plain", b"", &UploadLimits::default()).unwrap_err();
        assert_eq!(err, UploadError::Empty("empty.txt".to_string()));
    }

    #[test]
    fn test_rejects_unlisted_type() {
        let err = validate_upload(
            "macro.docm",
            "application/vnd.ms-word",
            b"data",
            &UploadLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType(_)));
    }

    #[test]
    fn test_mime_parameters_ignored() {
        let limits = UploadLimits::default();
        assert!(limits.allows("Text/Plain; charset=utf-8"));
    }

    #[test]
    fn test_mime_from_file_name() {
        assert_eq!(mime_from_file_name("W2_2023.PDF"), "application/pdf");
        assert_eq!(mime_from_file_name("scan.jpeg"), "image/jpeg");
        assert_eq!(mime_from_file_name("notes.txt"), "text/plain");
        assert_eq!(mime_from_file_name("README"), "application/octet-stream");
    }
}

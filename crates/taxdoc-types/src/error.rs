use thiserror::Error;

/// Rejections raised by the upload gate before extraction runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("File is empty: {0}")]
    Empty(String),

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
}

/// Failures of a document store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage quota exceeded: record needs {needed} bytes, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Per-document persistence seam
//!
//! The engine itself is stateless; callers persist one [`DocumentRecord`] per
//! document through a [`DocumentStore`]. `put` replaces a record as a whole.

use std::collections::BTreeMap;
use taxdoc_types::{
    DocumentMeta, ExtractedText, FinancialFields, FormClassification, RedFlag, StoreError,
};
use tracing::warn;

/// Everything known about one analyzed document
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentRecord {
    pub meta: DocumentMeta,
    pub extracted: ExtractedText,
    pub classification: FormClassification,
    pub fields: FinancialFields,
    pub red_flags: Vec<RedFlag>,
    /// RFC 3339 timestamp of the analysis
    pub analyzed_at: String,
}

pub trait DocumentStore: Send + Sync {
    fn get(&self, document_id: &str) -> Result<Option<DocumentRecord>, StoreError>;

    fn put(&mut self, record: DocumentRecord) -> Result<(), StoreError>;

    /// All records, ordered by document id
    fn list(&self) -> Result<Vec<DocumentRecord>, StoreError>;
}

/// Records kept in memory, with an optional quota on their JSON size
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    records: BTreeMap<String, DocumentRecord>,
    sizes: BTreeMap<String, usize>,
    quota_bytes: Option<usize>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Bytes currently used, measured on the JSON encoding
    pub fn used_bytes(&self) -> usize {
        self.sizes.values().sum()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, document_id: &str) -> Result<Option<DocumentRecord>, StoreError> {
        Ok(self.records.get(document_id).cloned())
    }

    fn put(&mut self, record: DocumentRecord) -> Result<(), StoreError> {
        let size = serde_json::to_vec(&record)?.len();
        let id = record.meta.id.clone();

        if let Some(quota) = self.quota_bytes {
            // A replaced record frees its old size
            let replaced = self.sizes.get(&id).copied().unwrap_or(0);
            let available = quota.saturating_sub(self.used_bytes() - replaced);
            if size > available {
                warn!(
                    document_id = %id,
                    size,
                    available,
                    "Document store quota exceeded, record discarded"
                );
                return Err(StoreError::QuotaExceeded {
                    needed: size,
                    available,
                });
            }
        }

        self.sizes.insert(id.clone(), size);
        self.records.insert(id, record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<DocumentRecord>, StoreError> {
        Ok(self.records.values().cloned().collect())
    }
}

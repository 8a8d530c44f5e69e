use crate::store::{DocumentRecord, DocumentStore};
use crate::TaxDocEngine;
use taxdoc_types::{DocumentMeta, ExtractedText, FinancialFields, StoreError};
use tracing::info;

/// Analyze one extracted document and persist the result.
///
/// The consistency set is re-read from `store` on every call, so a document
/// processed again after others were added sees them.
pub fn process_document(
    engine: &TaxDocEngine,
    meta: &DocumentMeta,
    extracted: &ExtractedText,
    store: &mut dyn DocumentStore,
) -> Result<DocumentRecord, StoreError> {
    let session: Vec<FinancialFields> = store.list()?.into_iter().map(|r| r.fields).collect();

    let analysis = engine.analyze(meta, extracted, &session);

    let record = DocumentRecord {
        meta: meta.clone(),
        extracted: extracted.clone(),
        classification: analysis.classification,
        fields: analysis.fields,
        red_flags: analysis.red_flags,
        analyzed_at: chrono::Utc::now().to_rfc3339(),
    };
    store.put(record.clone())?;

    info!(
        document_id = %meta.id,
        name = %meta.name,
        form_type = %record.classification.form_type,
        confidence = record.classification.confidence,
        red_flags = record.red_flags.len(),
        "Document processed"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use taxdoc_types::{ExtractionMethod, FormType};

    #[test]
    fn test_record_is_persisted() {
        let engine = TaxDocEngine::default();
        let mut store = InMemoryDocumentStore::new();
        let meta = DocumentMeta {
            id: "w2-doc".to_string(),
            name: "w2_2023.txt".to_string(),
            mime_type: "text/plain".to_string(),
        };
        let extracted = ExtractedText::new(
            &meta.id,
            ExtractionMethod::Plain,
            "Form W-2 Wage and Tax Statement\nWages, tips, other compensation $48,000.00"
                .to_string(),
        );

        let record = process_document(&engine, &meta, &extracted, &mut store).unwrap();
        assert_eq!(record.classification.form_type, FormType::W2);
        assert_eq!(record.fields.wages, Some(48000.0));
        assert_eq!(store.get("w2-doc").unwrap(), Some(record));
    }

    #[test]
    fn test_quota_error_propagates() {
        let engine = TaxDocEngine::default();
        let mut store = InMemoryDocumentStore::with_quota(16);
        let meta = DocumentMeta {
            id: "big".to_string(),
            name: "big.txt".to_string(),
            mime_type: "text/plain".to_string(),
        };
        let extracted = ExtractedText::new(&meta.id, ExtractionMethod::Plain, "text".to_string());
        let result = process_document(&engine, &meta, &extracted, &mut store);
        assert!(matches!(result, Err(StoreError::QuotaExceeded { .. })));
        assert!(store.is_empty());
    }
}

//! Reading files from disk and extracting their text

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use taxdoc_extract::upload::mime_from_file_name;
use taxdoc_extract::{validate_upload, TextExtractor, UploadLimits};
use taxdoc_types::{ExtractedText, ExtractionMethod, RawDocument};
use tokio::task::{Id, JoinSet};
use tracing::{debug, error, warn};

/// Read `paths` and keep the files that pass the upload gate.
///
/// Rejected files are logged and skipped; unreadable files are an error.
pub async fn load_documents(
    paths: &[PathBuf],
    limits: &UploadLimits,
) -> anyhow::Result<Vec<RawDocument>> {
    let mut documents = Vec::with_capacity(paths.len());

    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = file_name(path);
        let mime_type = mime_from_file_name(&name);

        if let Err(e) = validate_upload(&name, mime_type, &bytes, limits) {
            warn!(file = %path.display(), error = %e, "Upload rejected");
            continue;
        }

        let document = RawDocument::new(&name, mime_type, bytes);
        debug!(file = %name, id = %document.id, bytes = document.byte_size, "Document loaded");
        documents.push(document);
    }

    Ok(documents)
}

/// Extract every document on the blocking pool; results keep input order.
///
/// A task that panics yields a failed [`ExtractedText`] for its document
/// instead of failing the batch.
pub async fn extract_all(
    extractor: Arc<TextExtractor>,
    documents: Vec<RawDocument>,
) -> Vec<(Arc<RawDocument>, ExtractedText)> {
    let documents: Vec<Arc<RawDocument>> = documents.into_iter().map(Arc::new).collect();
    let mut slots: Vec<Option<ExtractedText>> = documents.iter().map(|_| None).collect();
    let mut task_index: HashMap<Id, usize> = HashMap::with_capacity(documents.len());

    let mut tasks = JoinSet::new();
    for (index, document) in documents.iter().enumerate() {
        let extractor = Arc::clone(&extractor);
        let document = Arc::clone(document);
        let handle = tasks.spawn_blocking(move || extractor.extract(&document));
        task_index.insert(handle.id(), index);
    }

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, extracted)) => {
                if let Some(&index) = task_index.get(&id) {
                    slots[index] = Some(extracted);
                }
            }
            Err(e) => {
                if let Some(&index) = task_index.get(&e.id()) {
                    let document = &documents[index];
                    error!(file = %document.name, error = %e, "Extraction task failed");
                    slots[index] = Some(task_failed(document, e.to_string()));
                }
            }
        }
    }

    documents
        .into_iter()
        .zip(slots)
        .map(|(document, extracted)| {
            let extracted = extracted
                .unwrap_or_else(|| task_failed(&document, "extraction task lost".to_string()));
            (document, extracted)
        })
        .collect()
}

fn task_failed(document: &RawDocument, error: String) -> ExtractedText {
    let method = if document.mime_type.starts_with("image/") {
        ExtractionMethod::Ocr
    } else if document.mime_type.contains("pdf") {
        ExtractionMethod::PdfText
    } else {
        ExtractionMethod::Plain
    };
    ExtractedText::failed(&document.id, method, error)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

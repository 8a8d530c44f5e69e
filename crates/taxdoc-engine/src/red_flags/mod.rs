//! Red flag detection
//!
//! Four independent scanners run over the same text and their flags are
//! concatenated in a fixed order: financial, compliance, documentation,
//! consistency. Every call recomputes the full set.

pub mod compliance;
pub mod consistency;
pub mod documentation;
pub mod financial;

use crate::config::DetectorConfig;
use taxdoc_types::{
    DocumentMeta, FinancialFields, FormType, RedFlag, RedFlagCategory, Severity, TextPosition,
};
use tracing::debug;

/// Everything a scanner may look at for one document
pub struct ScanInput<'a> {
    pub text: &'a str,
    pub meta: &'a DocumentMeta,
    pub form_type: FormType,
    pub fields: &'a FinancialFields,
    /// Parsed fields of every document in the session, this one included
    pub all_documents: &'a [FinancialFields],
    pub config: &'a DetectorConfig,
}

pub fn detect(input: &ScanInput) -> Vec<RedFlag> {
    if input.text.trim().is_empty() {
        return Vec::new();
    }

    let mut flags = Vec::new();
    flags.extend(financial::check_financial_issues(input));
    flags.extend(compliance::check_compliance(input));
    flags.extend(documentation::check_documentation(input));
    flags.extend(consistency::check_consistency(input));

    debug!(
        document_id = %input.meta.id,
        count = flags.len(),
        "Red flag scan complete"
    );
    flags
}

pub(crate) fn red_flag(
    input: &ScanInput,
    id: &str,
    category: RedFlagCategory,
    severity: Severity,
    message: String,
    location: Option<(String, TextPosition)>,
) -> RedFlag {
    let (snippet, text_position) = match location {
        Some((snippet, position)) => (Some(snippet), Some(position)),
        None => (None, None),
    };
    RedFlag {
        id: id.to_string(),
        category,
        severity,
        message,
        document_id: input.meta.id.clone(),
        snippet,
        text_position,
    }
}

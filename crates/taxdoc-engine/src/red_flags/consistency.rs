//! Cross-document checks against the other documents of the session

use super::{red_flag, ScanInput};
use crate::patterns::extract_context;
use taxdoc_types::{RedFlag, RedFlagCategory, Severity, TextPosition};

pub fn check_consistency(input: &ScanInput) -> Vec<RedFlag> {
    let Some(ssn) = input.fields.ssn.as_deref() else {
        return Vec::new();
    };

    let others = input
        .all_documents
        .iter()
        .filter(|doc| doc.document_id != input.meta.id);

    let mut duplicates = 0;
    let mut mismatches = 0;
    for other in others {
        match other.ssn.as_deref() {
            Some(other_ssn) if other_ssn == ssn => duplicates += 1,
            Some(_) => mismatches += 1,
            None => {}
        }
    }

    let location = input.text.find(ssn).map(|start| {
        let end = start + ssn.len();
        (
            extract_context(input.text, start, end),
            TextPosition {
                start_offset: start,
                end_offset: end,
            },
        )
    });

    let mut flags = Vec::new();
    if duplicates > 0 {
        flags.push(red_flag(
            input,
            "consistency.duplicate-ssn",
            RedFlagCategory::Consistency,
            Severity::Medium,
            format!("SSN also appears on {duplicates} other uploaded document(s)"),
            location.clone(),
        ));
    }
    if mismatches > 0 {
        flags.push(red_flag(
            input,
            "consistency.ssn-mismatch",
            RedFlagCategory::Consistency,
            Severity::High,
            format!("{mismatches} other uploaded document(s) carry a different SSN"),
            location,
        ));
    }
    flags
}

//! Property tax bills. Only the amount due is a field; income is left to the
//! generic fallback.

use crate::extractors::{first_positive, labeled};
use lazy_static::lazy_static;
use regex::Regex;
use taxdoc_types::FinancialFields;

lazy_static! {
    static ref TAX_DUE: Vec<Regex> = vec![
        labeled(r"total\s+(?:taxes\s+|tax\s+)?(?:due|amount\s+due)"),
        labeled(r"\bamount\s+due\b"),
        labeled(r"total\s+tax(?:es)?\b"),
        labeled(r"\btax\s+amount\b"),
    ];
}

pub fn extract(text: &str, fields: &mut FinancialFields) {
    fields.tax_owed = first_positive(text, &TAX_DUE);
}

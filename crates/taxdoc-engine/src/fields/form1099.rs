//! 1099 information returns
//!
//! A single upload often bundles several 1099 variants (a brokerage
//! consolidated statement carries INT, DIV and B). Every variant present
//! contributes one income component and the components sum into `income`.
//! Variants share generic "Box 1" labels, so amounts already attributed to one
//! variant are not reused by the next.

use super::{add_source, sum_sources};
use crate::extractors::amount::first_positive_unclaimed;
use crate::extractors::{first_positive, labeled};
use lazy_static::lazy_static;
use regex::Regex;
use taxdoc_types::FinancialFields;

struct Variant {
    label: &'static str,
    marker: Regex,
    amounts: Vec<Regex>,
}

impl Variant {
    fn new(label: &'static str, marker: &str, amounts: &[&str]) -> Self {
        Self {
            label,
            marker: Regex::new(&format!("(?i){marker}")).unwrap(),
            amounts: amounts.iter().map(|a| labeled(a)).collect(),
        }
    }
}

lazy_static! {
    static ref VARIANTS: Vec<Variant> = vec![
        Variant::new(
            "1099-INT interest",
            r"\b1099-?int\b|interest\s+income",
            &[r"interest\s+income", r"\bbox\s*1\b"],
        ),
        Variant::new(
            "1099-DIV dividends",
            r"\b1099-?div\b|ordinary\s+dividends",
            &[r"total\s+ordinary\s+dividends", r"ordinary\s+dividends", r"\bbox\s*1a\b"],
        ),
        Variant::new(
            "1099-NEC compensation",
            r"\b1099-?nec\b|nonemployee\s+compensation",
            &[r"nonemployee\s+compensation", r"\bbox\s*1\b"],
        ),
        Variant::new(
            "1099-MISC income",
            r"\b1099-?misc\b",
            &[r"other\s+income", r"\brents\b", r"\broyalties\b", r"\bbox\s*3\b"],
        ),
        Variant::new(
            "1099-B proceeds",
            r"\b1099-?b\b|proceeds\s+from\s+broker",
            &[r"\bproceeds\b", r"\bbox\s*1d\b"],
        ),
        Variant::new(
            "1099-R distributions",
            r"\b1099-?r\b|distributions\s+from\s+pensions",
            &[r"gross\s+distribution", r"\bbox\s*1\b"],
        ),
        Variant::new(
            "1099-G unemployment",
            r"\b1099-?g\b|unemployment\s+compensation",
            &[r"unemployment\s+compensation", r"\bbox\s*1\b"],
        ),
        Variant::new(
            "1099-K payments",
            r"\b1099-?k\b|payment\s+card\s+and\s+third\s+party",
            &[r"gross\s+amount\s+of\s+payment\s+card", r"\bbox\s*1a\b"],
        ),
    ];
    static ref WITHHELD: Vec<Regex> = vec![
        labeled(r"federal\s+income\s+tax\s+withheld"),
        labeled(r"\bbox\s*4\b"),
    ];
}

pub fn extract(text: &str, fields: &mut FinancialFields) {
    let mut claimed = Vec::new();

    for variant in VARIANTS.iter().filter(|v| v.marker.is_match(text)) {
        if let Some(amount) = first_positive_unclaimed(text, &variant.amounts, &mut claimed) {
            add_source(fields, variant.label, amount);
        }
    }

    fields.income = sum_sources(fields);
    fields.tax_withheld = first_positive(text, &WITHHELD);
}

//! Form 1040 individual income tax return

use super::add_source;
use crate::extractors::{first_positive, labeled};
use lazy_static::lazy_static;
use regex::Regex;
use taxdoc_types::FinancialFields;

lazy_static! {
    static ref WAGES: Vec<Regex> = vec![
        labeled(r"total\s+amount\s+from\s+form\(?s\)?\s+w-?2,?\s+box\s*1"),
        labeled(r"wages,\s*salaries,\s*tips"),
        labeled(r"\bline\s*1z\b"),
    ];
    static ref TOTAL_INCOME: Vec<Regex> = vec![
        labeled(r"this\s+is\s+your\s+total\s+income"),
        labeled(r"\btotal\s+income\b"),
        labeled(r"\bline\s*9\b"),
    ];
    static ref AGI: Vec<Regex> = vec![
        labeled(r"this\s+is\s+your\s+adjusted\s+gross\s+income"),
        labeled(r"adjusted\s+gross\s+income"),
        labeled(r"\bline\s*11\b"),
    ];
    static ref DEDUCTIONS: Vec<Regex> = vec![
        labeled(r"standard\s+deduction\s+or\s+itemized\s+deductions(?:\s+\(from\s+schedule\s+a\))?"),
        labeled(r"itemized\s+deductions"),
        labeled(r"standard\s+deduction"),
        labeled(r"\bline\s*12\b"),
    ];
    static ref TAXABLE_INCOME: Vec<Regex> = vec![
        labeled(r"this\s+is\s+your\s+taxable\s+income"),
        labeled(r"\btaxable\s+income\b"),
        labeled(r"\bline\s*15\b"),
    ];
    static ref TAX_OWED: Vec<Regex> = vec![
        labeled(r"amount\s+you\s+owe"),
        labeled(r"\bline\s*37\b"),
        labeled(r"this\s+is\s+your\s+total\s+tax"),
        labeled(r"\bline\s*24\b"),
    ];
    static ref WITHHELD: Vec<Regex> = vec![
        labeled(r"federal\s+income\s+tax\s+withheld"),
        labeled(r"\bline\s*25d\b"),
    ];
    static ref REFUND: Vec<Regex> = vec![
        labeled(r"amount\s+of\s+line\s+34\s+you\s+want\s+refunded\s+to\s+you"),
        labeled(r"refunded\s+to\s+you"),
        labeled(r"\bline\s*35a\b"),
        labeled(r"\brefund\b"),
    ];
}

pub fn extract(text: &str, fields: &mut FinancialFields) {
    fields.wages = first_positive(text, &WAGES);
    fields.adjusted_gross_income = first_positive(text, &AGI);
    fields.deductions = first_positive(text, &DEDUCTIONS);
    fields.taxable_income = first_positive(text, &TAXABLE_INCOME);
    fields.tax_owed = first_positive(text, &TAX_OWED);
    fields.tax_withheld = first_positive(text, &WITHHELD);
    fields.refund = first_positive(text, &REFUND);

    // Total income, else AGI as the closest stand-in
    if let Some(total) = first_positive(text, &TOTAL_INCOME).or(fields.adjusted_gross_income) {
        add_source(fields, "1040 total income", total);
        fields.income = Some(total);
    }
}

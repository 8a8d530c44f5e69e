//! Fallback extraction from loose dollar amounts

use super::add_source;
use crate::config::ValidationLimits;
use crate::extractors::amount::{find_amounts, nearest_keyword_before};
use crate::patterns::{DEDUCTION_KEYWORD, TAX_OWED_KEYWORD};
use taxdoc_types::FinancialFields;

enum Attribution {
    Deduction,
    TaxOwed,
    Unattributed,
}

/// Fill income from the largest plausible amount, and deductions / tax owed
/// from amounts within `window` bytes after their keywords. Fields already
/// set are kept.
pub fn extract(
    text: &str,
    fields: &mut FinancialFields,
    limits: &ValidationLimits,
    window: usize,
) {
    let amounts = find_amounts(text);

    let mut largest: Option<f64> = None;
    let mut deductions = None;
    let mut tax_owed = None;
    let mut previous_end = 0;

    for amount in &amounts {
        // A keyword only attributes the amounts up to the next amount
        let segment = &text[previous_end..amount.start];
        previous_end = amount.end;

        match attribute(segment, window) {
            Attribution::Deduction => {
                deductions.get_or_insert(amount.value);
            }
            Attribution::TaxOwed => {
                tax_owed.get_or_insert(amount.value);
            }
            Attribution::Unattributed => {
                let plausible =
                    amount.value >= limits.min_income && amount.value <= limits.max_income;
                if plausible && largest.map_or(true, |l| amount.value > l) {
                    largest = Some(amount.value);
                }
            }
        }
    }

    if fields.income.is_none() {
        if let Some(income) = largest {
            add_source(fields, "largest amount", income);
            fields.income = Some(income);
        }
    }
    if fields.deductions.is_none() {
        fields.deductions = deductions;
    }
    if fields.tax_owed.is_none() {
        fields.tax_owed = tax_owed;
    }
}

fn attribute(segment: &str, window: usize) -> Attribution {
    let end = segment.len();
    let deduction = nearest_keyword_before(segment, end, window, &DEDUCTION_KEYWORD);
    let owed = nearest_keyword_before(segment, end, window, &TAX_OWED_KEYWORD);
    match (deduction, owed) {
        (Some(d), Some(o)) if o > d => Attribution::TaxOwed,
        (Some(_), _) => Attribution::Deduction,
        (None, Some(_)) => Attribution::TaxOwed,
        (None, None) => Attribution::Unattributed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_KEYWORD_WINDOW;
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> FinancialFields {
        let mut fields = FinancialFields::new("generic");
        extract(
            text,
            &mut fields,
            &ValidationLimits::default(),
            DEFAULT_KEYWORD_WINDOW,
        );
        fields
    }

    #[test]
    fn test_largest_plausible_amount_is_income() {
        let fields = run("Paid $1,200.00 in March and $14,800.00 in total. Ref $90,000,000.00");
        assert_eq!(fields.income, Some(14800.0));
    }

    #[test]
    fn test_keywords_attribute_following_amount() {
        let fields = run(
            "Gross pay $61,000.00\nItemized deductions claimed $8,200.00\nBalance due $1,340.00",
        );
        assert_eq!(fields.income, Some(61000.0));
        assert_eq!(fields.deductions, Some(8200.0));
        assert_eq!(fields.tax_owed, Some(1340.0));
    }

    #[test]
    fn test_keyword_does_not_reach_past_an_amount() {
        let fields = run("Deductions $2,000.00 Salary $48,000.00");
        assert_eq!(fields.deductions, Some(2000.0));
        assert_eq!(fields.income, Some(48000.0));
    }

    #[test]
    fn test_keyword_beyond_window_is_ignored() {
        let text = format!("deductions{}$7,500.00", " filler".repeat(20));
        let fields = run(&text);
        assert_eq!(fields.deductions, None);
        assert_eq!(fields.income, Some(7500.0));
    }

    #[test]
    fn test_existing_fields_are_kept() {
        let mut fields = FinancialFields::new("generic");
        fields.tax_owed = Some(10.0);
        extract(
            "Tax due $500.00",
            &mut fields,
            &ValidationLimits::default(),
            DEFAULT_KEYWORD_WINDOW,
        );
        assert_eq!(fields.tax_owed, Some(10.0));
    }

    #[test]
    fn test_no_amounts() {
        let fields = run("Nothing to see here");
        assert_eq!(fields, FinancialFields::new("generic"));
    }
}

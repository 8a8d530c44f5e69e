//! Per-form monetary field extraction
//!
//! Each form module holds ordered regex alternatives per field, most specific
//! label first, generic "Box N" / "Line N" next, bare keyword last. The first
//! alternative yielding an amount `> 0` wins.

pub mod form1040;
pub mod form1099;
pub mod generic;
pub mod property_tax;
pub mod schedules;
pub mod w2;

use crate::config::{ValidationLimits, DEFAULT_KEYWORD_WINDOW};
use crate::extractors::{extract_ssn, extract_tax_year};
use crate::patterns::normalize_text;
use taxdoc_types::{FinancialFields, FormType, IncomeSource};
use tracing::debug;

/// Parse with the default plausibility range and keyword window for the
/// generic fallback
pub fn parse(document_id: &str, form_type: FormType, text: &str) -> FinancialFields {
    parse_with(
        document_id,
        form_type,
        text,
        &ValidationLimits::default(),
        DEFAULT_KEYWORD_WINDOW,
    )
}

/// Extract the monetary fields of a document classified as `form_type`.
///
/// Runs the form-specific extractor, then the generic dollar-amount fallback
/// when income is still unset. `limits` only bounds which amounts the
/// fallback considers plausible income; range checks belong to the validator.
/// `keyword_window` is how far back the fallback looks for a deduction or
/// tax-owed keyword.
pub fn parse_with(
    document_id: &str,
    form_type: FormType,
    text: &str,
    limits: &ValidationLimits,
    keyword_window: usize,
) -> FinancialFields {
    let mut fields = FinancialFields::new(document_id);
    let text = normalize_text(text);
    if text.is_empty() {
        return fields;
    }

    match form_type {
        FormType::W2 => w2::extract(&text, &mut fields),
        FormType::Form1099 => form1099::extract(&text, &mut fields),
        FormType::Form1040 => form1040::extract(&text, &mut fields),
        FormType::ScheduleC => schedules::extract_schedule_c(&text, &mut fields),
        FormType::ScheduleE => schedules::extract_schedule_e(&text, &mut fields),
        FormType::PropertyTax => property_tax::extract(&text, &mut fields),
        FormType::Generic => {}
    }

    fields.ssn = extract_ssn(&text);
    fields.tax_year = extract_tax_year(&text);

    if fields.income.is_none() {
        generic::extract(&text, &mut fields, limits, keyword_window);
    }

    debug!(
        document_id,
        form_type = %form_type,
        income = ?fields.income,
        sources = fields.income_sources.len(),
        "Fields parsed"
    );
    fields
}

/// Record one component of `income`
pub(crate) fn add_source(fields: &mut FinancialFields, label: &str, amount: f64) {
    fields.income_sources.push(IncomeSource {
        label: label.to_string(),
        amount,
    });
}

/// Sum of the recorded income components, `None` when there are none
pub(crate) fn sum_sources(fields: &FinancialFields) -> Option<f64> {
    if fields.income_sources.is_empty() {
        None
    } else {
        Some(fields.income_sources.iter().map(|s| s.amount).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_text_yields_empty_fields() {
        let fields = parse("doc", FormType::W2, "   \n ");
        assert_eq!(fields, FinancialFields::new("doc"));
    }

    #[test]
    fn test_identity_fields_for_every_form() {
        let text = "2023 Form 1099-INT\nRecipient SSN 123-45-6789\nInterest income $812.40";
        let fields = parse("doc", FormType::Form1099, text);
        assert_eq!(fields.ssn.as_deref(), Some("123-45-6789"));
        assert_eq!(fields.tax_year, Some(2023));
        assert_eq!(fields.income, Some(812.40));
    }

    #[test]
    fn test_generic_fallback_runs_when_typed_pass_finds_nothing() {
        let text = "Statement of account. Total received $18,250.00 during the year.";
        let fields = parse("doc", FormType::W2, text);
        assert_eq!(fields.income, Some(18250.0));
    }

    #[test]
    fn test_generic_form_uses_fallback_only() {
        let text = "Consulting income $42,000.00\nItemized deductions $9,500.00";
        let fields = parse("doc", FormType::Generic, text);
        assert_eq!(fields.income, Some(42000.0));
        assert_eq!(fields.deductions, Some(9500.0));
    }

    #[test]
    fn test_keyword_window_is_configurable() {
        let text = format!("Deductions{}$7,500.00", " filler".repeat(20));
        let limits = ValidationLimits::default();

        let narrow = parse_with(
            "doc",
            FormType::Generic,
            &text,
            &limits,
            DEFAULT_KEYWORD_WINDOW,
        );
        assert_eq!(narrow.deductions, None);

        let wide = parse_with("doc", FormType::Generic, &text, &limits, 200);
        assert_eq!(wide.deductions, Some(7500.0));
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let text = "Form W-2 Wages, tips, other compensation $52,000.00 Federal income tax withheld $6,100.00";
        assert_eq!(
            parse("doc", FormType::W2, text),
            parse("doc", FormType::W2, text)
        );
    }
}

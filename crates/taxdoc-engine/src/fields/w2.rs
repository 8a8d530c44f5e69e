//! W-2 wage and tax statement

use super::add_source;
use crate::extractors::{first_positive, labeled};
use lazy_static::lazy_static;
use regex::Regex;
use taxdoc_types::FinancialFields;

lazy_static! {
    static ref WAGES: Vec<Regex> = vec![
        labeled(r"wages,?\s*tips,?\s*(?:and\s+)?other\s+comp(?:ensation)?"),
        labeled(r"\bbox\s*1\b"),
        labeled(r"\bwages\b"),
    ];
    static ref WITHHELD: Vec<Regex> = vec![
        labeled(r"federal\s+income\s+tax\s+withheld"),
        labeled(r"\bbox\s*2\b"),
        labeled(r"\btax\s+withheld\b"),
    ];
}

pub fn extract(text: &str, fields: &mut FinancialFields) {
    fields.wages = first_positive(text, &WAGES);
    fields.tax_withheld = first_positive(text, &WITHHELD);

    if let Some(wages) = fields.wages {
        add_source(fields, "W-2 wages", wages);
        fields.income = Some(wages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> FinancialFields {
        let mut fields = FinancialFields::new("w2");
        extract(text, &mut fields);
        fields
    }

    #[test]
    fn test_boxed_labels() {
        let fields = run(
            "Form W-2 Wage and Tax Statement\n\
             1 Wages, tips, other compensation $52,340.17\n\
             2 Federal income tax withheld $6,120.00\n\
             3 Social security wages 54,000.00",
        );
        assert_eq!(fields.wages, Some(52340.17));
        assert_eq!(fields.income, Some(52340.17));
        assert_eq!(fields.tax_withheld, Some(6120.0));
        assert_eq!(fields.income_sources.len(), 1);
    }

    #[test]
    fn test_box_number_fallback() {
        let fields = run("Box 1: 41,000.00 Box 2: 3,900.00");
        assert_eq!(fields.wages, Some(41000.0));
        assert_eq!(fields.tax_withheld, Some(3900.0));
    }

    #[test]
    fn test_box_12_is_not_box_1() {
        let fields = run("Box 12 code D 1,500.00");
        assert_eq!(fields.wages, None);
    }

    #[test]
    fn test_zero_boxed_value_falls_through_to_keyword() {
        let fields = run("Wages, tips, other compensation 0.00\nAnnual summary. Wages: 38,500.00");
        assert_eq!(fields.wages, Some(38500.0));
    }

    #[test]
    fn test_year_after_label_is_not_the_value() {
        let fields = run(
            "Wages, tips, other compensation for 2023 $52,000.00\n\
             Federal income tax withheld for 2023 $6,100.00",
        );
        assert_eq!(fields.wages, Some(52000.0));
        assert_eq!(fields.tax_withheld, Some(6100.0));
    }

    #[test]
    fn test_nothing_found() {
        let fields = run("Employer name and address");
        assert_eq!(fields.wages, None);
        assert_eq!(fields.income, None);
        assert!(fields.income_sources.is_empty());
    }
}

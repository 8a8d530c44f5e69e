use super::{red_flag, ScanInput};
use crate::patterns::locate;
use lazy_static::lazy_static;
use regex::Regex;
use taxdoc_types::{RedFlag, RedFlagCategory, Severity};

lazy_static! {
    static ref WAGE_LANGUAGE: Regex =
        Regex::new(r"(?i)\b(?:wages|salary|salaries|payroll)\b").unwrap();
    static ref W2_REFERENCE: Regex =
        Regex::new(r"(?i)\bw-?2\b|wage\s+and\s+tax\s+statement").unwrap();
    static ref CONTRACT_INCOME_LANGUAGE: Regex = Regex::new(
        r"(?i)\b(?:interest\s+income|dividends|nonemployee\s+compensation|freelance|independent\s+contractor|self-employment\s+income)\b"
    )
    .unwrap();
    static ref FORM_1099_REFERENCE: Regex = Regex::new(r"(?i)\b1099\b").unwrap();
    static ref SIGNATURE_OR_DATE: Regex = Regex::new(concat!(
        r"(?i)\b(?:signature|signed|sign\s+here|dated?)\b",
        r"|\b\d{1,2}/\d{1,2}/\d{2,4}\b",
        r"|\b\d{4}-\d{2}-\d{2}\b",
        r"|\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4}\b",
    ))
    .unwrap();
}

pub fn check_documentation(input: &ScanInput) -> Vec<RedFlag> {
    let mut flags = Vec::new();

    if !W2_REFERENCE.is_match(input.text) {
        if let Some(location) = locate(input.text, &WAGE_LANGUAGE) {
            flags.push(red_flag(
                input,
                "documentation.missing-w2",
                RedFlagCategory::Documentation,
                Severity::Medium,
                "Wage income is mentioned but no W-2 is referenced".to_string(),
                Some(location),
            ));
        }
    }

    if !FORM_1099_REFERENCE.is_match(input.text) {
        if let Some(location) = locate(input.text, &CONTRACT_INCOME_LANGUAGE) {
            flags.push(red_flag(
                input,
                "documentation.missing-1099",
                RedFlagCategory::Documentation,
                Severity::Medium,
                "Interest, dividend or contractor income is mentioned but no 1099 is referenced"
                    .to_string(),
                Some(location),
            ));
        }
    }

    if !SIGNATURE_OR_DATE.is_match(input.text) {
        flags.push(red_flag(
            input,
            "documentation.unsigned",
            RedFlagCategory::Documentation,
            Severity::Medium,
            "No signature or date found on the document".to_string(),
            None,
        ));
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::red_flags::test_support::scan;
    use taxdoc_types::FormType;

    fn ids(text: &str) -> Vec<String> {
        scan(text, FormType::Generic, check_documentation)
            .into_iter()
            .map(|f| f.id)
            .collect()
    }

    #[test]
    fn test_wages_without_w2() {
        assert_eq!(
            ids("Annual salary statement. Signed 03/01/2024"),
            vec!["documentation.missing-w2"]
        );
        assert!(ids("Form W-2 wages. Date: 01/31/2024").is_empty());
    }

    #[test]
    fn test_contract_income_without_1099() {
        assert_eq!(
            ids("Freelance work summary, January 15, 2024"),
            vec!["documentation.missing-1099"]
        );
        assert!(ids("1099-NEC nonemployee compensation 2024-01-31").is_empty());
    }

    #[test]
    fn test_missing_signature_and_date() {
        assert_eq!(ids("Form 1099-INT"), vec!["documentation.unsigned"]);
        assert!(ids("Form 1099-INT. Signature on file").is_empty());
    }
}

use super::{red_flag, ScanInput};
use crate::extractors::amount::{find_amounts, nearest_keyword_before};
use crate::patterns::{extract_context, locate, DEDUCTION_KEYWORD};
use lazy_static::lazy_static;
use regex::Regex;
use taxdoc_types::{RedFlag, RedFlagCategory, Severity, TextPosition};

lazy_static! {
    /// (rule id, pattern, severity, message)
    static ref PHRASE_RULES: Vec<(&'static str, Regex, Severity, &'static str)> = vec![
        (
            "financial.tax-lien",
            Regex::new(r"(?i)\b(?:tax\s+)?liens?\b").unwrap(),
            Severity::High,
            "Document references a tax lien",
        ),
        (
            "financial.levy",
            Regex::new(r"(?i)\b(?:levy|levies|levied|garnish(?:ed|ment)?)\b").unwrap(),
            Severity::High,
            "Document references a levy or wage garnishment",
        ),
        (
            "financial.overdue",
            Regex::new(r"(?i)\b(?:overdue|past\s+due|delinquent|final\s+notice|failure\s+to\s+pay)\b")
                .unwrap(),
            Severity::High,
            "Document indicates an overdue tax balance",
        ),
        (
            "financial.debt",
            Regex::new(
                r"(?i)\b(?:debt|collection\s+agency|collections|outstanding\s+balance|installment\s+agreement)\b"
            )
            .unwrap(),
            Severity::Medium,
            "Document references outstanding debt",
        ),
    ];
}

pub fn check_financial_issues(input: &ScanInput) -> Vec<RedFlag> {
    let mut flags = Vec::new();

    for (id, pattern, severity, message) in PHRASE_RULES.iter() {
        if let Some(location) = locate(input.text, pattern) {
            flags.push(red_flag(
                input,
                id,
                RedFlagCategory::Financial,
                *severity,
                message.to_string(),
                Some(location),
            ));
        }
    }

    flags.extend(check_unusual_amount(input));
    flags.extend(check_large_deduction(input));

    flags
}

/// Any single amount above the unusual-amount threshold
fn check_unusual_amount(input: &ScanInput) -> Option<RedFlag> {
    let threshold = input.config.unusual_amount;
    let amount = find_amounts(input.text)
        .into_iter()
        .find(|a| a.value > threshold)?;

    Some(red_flag(
        input,
        "financial.unusual-amount",
        RedFlagCategory::Financial,
        Severity::Medium,
        format!(
            "Unusually large amount ${:.2} exceeds ${:.0}",
            amount.value, threshold
        ),
        Some(located(input.text, amount.start, amount.end)),
    ))
}

/// An amount above the large-deduction threshold shortly after a deduction keyword
fn check_large_deduction(input: &ScanInput) -> Option<RedFlag> {
    let threshold = input.config.large_deduction;
    let window = input.config.keyword_window;

    let amount = find_amounts(input.text).into_iter().find(|a| {
        a.value > threshold
            && nearest_keyword_before(input.text, a.start, window, &DEDUCTION_KEYWORD).is_some()
    })?;

    Some(red_flag(
        input,
        "financial.large-deduction",
        RedFlagCategory::Financial,
        Severity::Medium,
        format!(
            "Deduction of ${:.2} exceeds ${:.0}; verify supporting records",
            amount.value, threshold
        ),
        Some(located(input.text, amount.start, amount.end)),
    ))
}

fn located(text: &str, start: usize, end: usize) -> (String, TextPosition) {
    (
        extract_context(text, start, end),
        TextPosition {
            start_offset: start,
            end_offset: end,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::red_flags::test_support::scan;
    use taxdoc_types::FormType;

    fn ids(text: &str) -> Vec<String> {
        scan(text, FormType::Generic, check_financial_issues)
            .into_iter()
            .map(|f| f.id)
            .collect()
    }

    #[test]
    fn test_tax_lien_is_high() {
        let flags = scan(
            "The IRS has filed a tax lien against the property",
            FormType::Generic,
            check_financial_issues,
        );
        let lien = flags.iter().find(|f| f.id == "financial.tax-lien").unwrap();
        assert_eq!(lien.severity, Severity::High);
        assert_eq!(lien.category, RedFlagCategory::Financial);
        let position = lien.text_position.as_ref().unwrap();
        assert_eq!(position.start_offset, 20);
        assert!(lien.snippet.as_ref().unwrap().contains("tax lien"));
    }

    #[test]
    fn test_phrase_families() {
        assert_eq!(ids("Notice of levy on wages"), vec!["financial.levy"]);
        assert_eq!(ids("Your account is PAST DUE"), vec!["financial.overdue"]);
        assert_eq!(ids("Outstanding balance remains"), vec!["financial.debt"]);
        assert!(ids("Lienholder information").is_empty());
    }

    #[test]
    fn test_unusual_amount() {
        assert_eq!(
            ids("Gross proceeds $1,250,000.00"),
            vec!["financial.unusual-amount"]
        );
        assert!(ids("Gross proceeds $1,000,000.00").is_empty());
    }

    #[test]
    fn test_large_deduction_near_keyword() {
        assert_eq!(
            ids("Itemized deductions claimed: $62,000.00"),
            vec!["financial.large-deduction"]
        );
        // Large amounts without a deduction keyword nearby are fine
        assert!(ids("Wages $62,000.00").is_empty());
        assert!(ids("Itemized deductions $12,000.00").is_empty());
    }

    #[test]
    fn test_large_deduction_offsets_index_the_original_text() {
        // 'İ' is two bytes but lower-cases to three
        let text = "İİİ ITEMIZED DEDUCTIONS $75,000.00";
        let flags = scan(text, FormType::Generic, check_financial_issues);
        let flag = flags
            .iter()
            .find(|f| f.id == "financial.large-deduction")
            .unwrap();
        let position = flag.text_position.as_ref().unwrap();
        assert_eq!(
            &text[position.start_offset..position.end_offset],
            "$75,000.00"
        );
    }

    #[test]
    fn test_clean_text() {
        assert!(ids("Wages, tips, other compensation $45,000.00").is_empty());
    }
}

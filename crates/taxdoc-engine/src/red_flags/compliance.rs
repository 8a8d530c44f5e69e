use super::{red_flag, ScanInput};
use crate::extractors::{extract_tax_year, find_malformed_ids};
use crate::patterns::extract_context;
use lazy_static::lazy_static;
use regex::Regex;
use taxdoc_types::{FormType, RedFlag, RedFlagCategory, Severity, TextPosition};

struct RequiredElement {
    form_type: FormType,
    name: &'static str,
    pattern: Regex,
}

impl RequiredElement {
    fn new(form_type: FormType, name: &'static str, pattern: &str) -> Self {
        Self {
            form_type,
            name,
            pattern: Regex::new(&format!("(?i){pattern}")).unwrap(),
        }
    }
}

lazy_static! {
    static ref REQUIRED_ELEMENTS: Vec<RequiredElement> = vec![
        RequiredElement::new(
            FormType::W2,
            "employer identification number",
            r"employer\s+identification\s+number|\bein\b|\b\d{2}-\d{7}\b",
        ),
        RequiredElement::new(
            FormType::W2,
            "employee social security number",
            r"social\s+security\s+number|\bssn\b|\b\d{3}-\d{2}-\d{4}\b",
        ),
        RequiredElement::new(
            FormType::Form1099,
            "payer TIN",
            r"payer'?s\s+(?:tin|federal\s+identification\s+number)|\b\d{2}-\d{7}\b",
        ),
        RequiredElement::new(
            FormType::Form1099,
            "recipient TIN",
            r"recipient'?s\s+(?:tin|identification\s+number)|\b\d{3}-\d{2}-\d{4}\b",
        ),
        RequiredElement::new(FormType::Form1040, "filing status", r"filing\s+status"),
        RequiredElement::new(
            FormType::Form1040,
            "taxpayer signature",
            r"sign\s+here|your\s+signature|signature",
        ),
        RequiredElement::new(
            FormType::ScheduleC,
            "principal business or profession",
            r"principal\s+business|business\s+code",
        ),
        RequiredElement::new(
            FormType::ScheduleE,
            "property address",
            r"physical\s+address|property\s+address|address\s+of\s+(?:each\s+)?property",
        ),
        RequiredElement::new(
            FormType::PropertyTax,
            "parcel or account number",
            r"parcel|folio|account\s+(?:number|no\.?)",
        ),
    ];
}

pub fn check_compliance(input: &ScanInput) -> Vec<RedFlag> {
    let mut flags = Vec::new();
    flags.extend(check_required_elements(input));
    flags.extend(check_malformed_ids(input));
    flags.extend(check_tax_year(input));
    flags
}

/// Elements every form of the classified type must carry
fn check_required_elements(input: &ScanInput) -> Vec<RedFlag> {
    REQUIRED_ELEMENTS
        .iter()
        .filter(|e| e.form_type == input.form_type && !e.pattern.is_match(input.text))
        .map(|e| {
            red_flag(
                input,
                "compliance.missing-element",
                RedFlagCategory::Compliance,
                Severity::Medium,
                format!("{} is missing the {}", input.form_type, e.name),
                None,
            )
        })
        .collect()
}

/// Nine-digit ids not hyphenated as an SSN (XXX-XX-XXXX) or EIN (XX-XXXXXXX)
fn check_malformed_ids(input: &ScanInput) -> Vec<RedFlag> {
    find_malformed_ids(input.text)
        .into_iter()
        .map(|id| {
            red_flag(
                input,
                "compliance.malformed-id",
                RedFlagCategory::Compliance,
                Severity::High,
                format!(
                    "Identifier {} is not formatted as an SSN or EIN",
                    mask(&id.raw)
                ),
                Some((
                    extract_context(input.text, id.start, id.end),
                    TextPosition {
                        start_offset: id.start,
                        end_offset: id.end,
                    },
                )),
            )
        })
        .collect()
}

/// Keep only the last four digits of an identifier
fn mask(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("***{tail}")
}

fn check_tax_year(input: &ScanInput) -> Option<RedFlag> {
    let year = input
        .fields
        .tax_year
        .or_else(|| extract_tax_year(input.text))?;
    let reference = input.config.reference_year;

    if year < reference - input.config.stale_after_years {
        Some(red_flag(
            input,
            "compliance.stale-tax-year",
            RedFlagCategory::Compliance,
            Severity::Medium,
            format!("Tax year {year} is more than {} years old", input.config.stale_after_years),
            None,
        ))
    } else if year > reference {
        Some(red_flag(
            input,
            "compliance.future-tax-year",
            RedFlagCategory::Compliance,
            Severity::Medium,
            format!("Tax year {year} is after the current year {reference}"),
            None,
        ))
    } else {
        None
    }
}

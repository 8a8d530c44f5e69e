//! SSN / EIN shapes and tax-year detection

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SSN_PATTERN: Regex = Regex::new(r"\b(\d{3})-(\d{2})-(\d{4})\b").unwrap();

    /// Labeled SSN with spaces or no separators
    static ref LABELED_SSN_PATTERN: Regex = Regex::new(
        r"(?i)(?:social\s+security\s+number|\bssn\b)[^\d]{0,30}?(\d{3})[\s-]?(\d{2})[\s-]?(\d{4})\b"
    )
    .unwrap();

    /// Digit runs that could be a taxpayer id in any shape
    static ref ID_CANDIDATE: Regex = Regex::new(r"\b\d[\d-]{7,10}\d\b").unwrap();

    static ref TAX_YEAR_PATTERNS: Vec<Regex> = vec![
        Regex::new(
            r"(?i)(?:tax\s+year|taxable\s+year|calendar\s+year|for\s+the\s+year|year\s+ending)[:\s]*(?:\w+\s+\d{1,2},?\s+)?((?:19|20)\d{2})\b"
        )
        .unwrap(),
        Regex::new(r"(?i)\bform\s+(?:w-?2|1099(?:-[a-z]+)?|1040(?:-sr)?)[\s)(]*((?:19|20)\d{2})\b")
            .unwrap(),
        Regex::new(r"(?i)\b((?:19|20)\d{2})\s+form\s+(?:w-?2|1099|1040)").unwrap(),
        Regex::new(r"(?i)\b((?:19|20)\d{2})\s+(?:property\s+tax|tax\s+bill|real\s+estate\s+tax)").unwrap(),
        // Form titles printed before the year
        Regex::new(r"(?i)\bwage\s+and\s+tax\s+statement[\s:,-]*((?:19|20)\d{2})(?:[^\d-]|$)")
            .unwrap(),
        Regex::new(
            r"(?i)\b(?:interest\s+income|dividends\s+and\s+distributions|nonemployee\s+compensation|miscellaneous\s+(?:income|information)|proceeds\s+from\s+broker\S*(?:\s+and\s+barter\s+exchange\s+transactions)?)[\s:,-]*((?:19|20)\d{2})(?:[^\d-]|$)"
        )
        .unwrap(),
    ];
}

/// Shape of a 9-digit identifier as written in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdShape {
    /// `XXX-XX-XXXX`
    Ssn,
    /// `XX-XXXXXXX`
    Ein,
    /// `XXXXX-XXXX`, a ZIP+4 code rather than an id
    ZipPlusFour,
    /// Nine digits in any other arrangement
    Malformed,
}

/// Classify the hyphenation of a candidate with exactly nine digits
pub fn id_shape(candidate: &str) -> Option<IdShape> {
    let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
    if digits != 9 {
        return None;
    }
    let groups: Vec<usize> = candidate.split('-').map(str::len).collect();
    let shape = match groups.as_slice() {
        [3, 2, 4] => IdShape::Ssn,
        [2, 7] => IdShape::Ein,
        [5, 4] => IdShape::ZipPlusFour,
        _ => IdShape::Malformed,
    };
    Some(shape)
}

/// A nine-digit run in the text that is not hyphenated as an SSN or EIN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedId {
    pub raw: String,
    pub start: usize,
    pub end: usize,
}

/// Find nine-digit identifiers whose hyphenation is wrong.
///
/// Runs that are part of a larger number (`123456789.00`, `$123456789`,
/// `1,123456789`) are skipped.
pub fn find_malformed_ids(text: &str) -> Vec<MalformedId> {
    let bytes = text.as_bytes();
    ID_CANDIDATE
        .find_iter(text)
        .filter(|m| {
            let before = m.start().checked_sub(1).map(|i| bytes[i]);
            let after = bytes.get(m.end()).copied();
            let glued_before = matches!(before, Some(b'$' | b',' | b'.'));
            let glued_after = matches!(after, Some(b'.' | b',')) && {
                bytes.get(m.end() + 1).is_some_and(|b| b.is_ascii_digit())
            };
            !glued_before && !glued_after
        })
        .filter(|m| id_shape(m.as_str()) == Some(IdShape::Malformed))
        .map(|m| MalformedId {
            raw: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// First SSN in the text, normalized to `XXX-XX-XXXX`
pub fn extract_ssn(text: &str) -> Option<String> {
    SSN_PATTERN
        .captures(text)
        .or_else(|| LABELED_SSN_PATTERN.captures(text))
        .map(|caps| format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
}

/// Tax year stated on the document, from the most specific phrasing found
pub fn extract_tax_year(text: &str) -> Option<i32> {
    TAX_YEAR_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

//! Dollar amount recognition and parsing

use crate::patterns::window_before;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Capture group for a monetary amount: optional sign, `$`, thousands commas,
/// up to two decimals, optional accounting parentheses.
///
/// A bare integer needs at least three digits so that box and line numbers
/// (`Box 1`, `Line 12`) sitting between a label and its value are not taken
/// for the value. Bare 1900..=2099 reads as a year, never as an amount.
pub const AMOUNT: &str = concat!(
    r"(\(?-?\$\s?-?\d[\d,]*(?:\.\d{1,2})?\)?",
    r"|\(?-?\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?\)?",
    r"|\(?-?\d+\.\d{1,2}\)?",
    r"|\(?-?(?:\d{5,}|1[0-8]\d{2}|2[1-9]\d{2}|[3-9]\d{3}|\d{3})\b\)?)",
);

/// Filler allowed between a label and its amount: non-digits, plus whole
/// year tokens as in "withheld for 2023 $6,100.00"
pub const GAP: &str = r"(?:[^\d]|\b(?:19|20)\d{2}\b){0,40}?";

lazy_static! {
    /// Amounts that are unambiguously money: `$`-prefixed or comma-grouped
    pub static ref DOLLAR_AMOUNT: Regex =
        Regex::new(r"\$\s?\d[\d,]*(?:\.\d{1,2})?|\b\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?").unwrap();
}

/// Build a case-insensitive "label ... amount" pattern
pub fn labeled(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){label}{GAP}{AMOUNT}")).unwrap()
}

/// Parse a monetary string such as `$1,234.56` or `(500.00)`.
///
/// Strips `$`, commas and whitespace. Returns 0.0 when no number can be read;
/// callers treat anything `<= 0` as "no match".
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let negative_parens = trimmed.starts_with('(') && trimmed.ends_with(')');

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '(' | ')') && !c.is_whitespace())
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if negative_parens {
                -value.abs()
            } else {
                value
            }
        }
        _ => 0.0,
    }
}

fn amount_from(caps: &Captures) -> Option<(f64, usize, usize)> {
    let m = caps.get(1)?;
    Some((parse_amount(m.as_str()), m.start(), m.end()))
}

/// Try each alternative in order and return the first positive amount.
///
/// Alternatives go from most specific (boxed label) to least specific (bare
/// keyword). Every match of an alternative is tried before moving on.
pub fn first_positive(text: &str, alternatives: &[Regex]) -> Option<f64> {
    first_positive_unclaimed(text, alternatives, &mut Vec::new())
}

/// Like [`first_positive`], but skips amounts whose span is already in
/// `claimed` and records the span it returns. Used where several fields may
/// fall back to the same generic "Box 1" pattern.
pub fn first_positive_unclaimed(
    text: &str,
    alternatives: &[Regex],
    claimed: &mut Vec<(usize, usize)>,
) -> Option<f64> {
    for pattern in alternatives {
        for caps in pattern.captures_iter(text) {
            let Some((value, start, end)) = amount_from(&caps) else {
                continue;
            };
            let overlaps = claimed.iter().any(|&(s, e)| start < e && s < end);
            if value > 0.0 && !overlaps {
                claimed.push((start, end));
                return Some(value);
            }
        }
    }
    None
}

/// A money amount found in free text
#[derive(Debug, Clone, PartialEq)]
pub struct FoundAmount {
    pub value: f64,
    pub start: usize,
    pub end: usize,
}

/// Every `$`-prefixed or comma-grouped amount in `text`
pub fn find_amounts(text: &str) -> Vec<FoundAmount> {
    DOLLAR_AMOUNT
        .find_iter(text)
        .map(|m| FoundAmount {
            value: parse_amount(m.as_str()),
            start: m.start(),
            end: m.end(),
        })
        .filter(|a| a.value > 0.0)
        .collect()
}

/// Position (relative to the window start) of the end of the closest
/// `keywords` match in the `window` bytes before `pos`, if any
pub fn nearest_keyword_before(
    text: &str,
    pos: usize,
    window: usize,
    keywords: &Regex,
) -> Option<usize> {
    keywords
        .find_iter(window_before(text, pos, window))
        .map(|m| m.end())
        .last()
}

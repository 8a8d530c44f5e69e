//! Keyword families and text helpers shared by the parser and the red-flag scanners

use lazy_static::lazy_static;
use regex::Regex;
use taxdoc_types::TextPosition;

/// Keywords that attribute a nearby amount to deductions
pub const DEDUCTION_KEYWORDS: &[&str] = &[
    "deduction",
    "deductions",
    "deductible",
    "itemized",
    "write-off",
    "write off",
    "expenses",
];

/// Keywords that attribute a nearby amount to tax owed
pub const TAX_OWED_KEYWORDS: &[&str] = &[
    "tax owed",
    "tax due",
    "amount owed",
    "amount due",
    "balance due",
    "you owe",
    "total tax",
];

lazy_static! {
    /// Case-insensitive matcher for [`DEDUCTION_KEYWORDS`]
    pub static ref DEDUCTION_KEYWORD: Regex = keyword_pattern(DEDUCTION_KEYWORDS);
    /// Case-insensitive matcher for [`TAX_OWED_KEYWORDS`]
    pub static ref TAX_OWED_KEYWORD: Regex = keyword_pattern(TAX_OWED_KEYWORDS);

    static ref SPACES: Regex = Regex::new(r"[ \t\x{00A0}\x{2007}\x{202F}]+").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n\s*\n+").unwrap();
    static ref DASHES: Regex = Regex::new(r"[\x{2010}-\x{2015}\x{2212}]").unwrap();
}

/// Longest keywords first so a match covers the whole word
fn keyword_pattern(keywords: &[&str]) -> Regex {
    let mut sorted = keywords.to_vec();
    sorted.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternation: Vec<String> = sorted.iter().map(|k| regex::escape(k)).collect();
    Regex::new(&format!("(?i){}", alternation.join("|"))).unwrap()
}

/// Normalize extracted text before field parsing.
///
/// Collapses horizontal whitespace (including non-breaking spaces), maps
/// typographic dashes to `-`, squeezes blank lines. Characters are never
/// guessed at: `0`/`O` and `1`/`I`/`|` are left alone.
pub fn normalize_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = DASHES.replace_all(&text, "-");
    let text = SPACES.replace_all(&text, " ");
    let text = BLANK_LINES.replace_all(&text, "\n");
    text.trim().to_string()
}

/// Largest byte index `<= index` that falls on a char boundary
pub fn floor_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest byte index `>= index` that falls on a char boundary
pub fn ceil_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// The `width` bytes of text preceding `pos`, clamped to char boundaries
pub fn window_before(text: &str, pos: usize, width: usize) -> &str {
    let end = floor_boundary(text, pos);
    let start = ceil_boundary(text, end.saturating_sub(width));
    &text[start..end]
}

/// Extract context around a match for display
pub fn extract_context(text: &str, start: usize, end: usize) -> String {
    let context_size = 50;
    let ctx_start = ceil_boundary(text, start.saturating_sub(context_size));
    let ctx_end = floor_boundary(text, (end + context_size).min(text.len()));

    let mut result = String::new();
    if ctx_start > 0 {
        result.push_str("...");
    }
    result.push_str(text[ctx_start..ctx_end].trim());
    if ctx_end < text.len() {
        result.push_str("...");
    }
    result
}

/// Snippet and highlight position of the first match of `pattern`
pub fn locate(text: &str, pattern: &Regex) -> Option<(String, TextPosition)> {
    pattern.find(text).map(|m| {
        (
            extract_context(text, m.start(), m.end()),
            TextPosition {
                start_offset: m.start(),
                end_offset: m.end(),
            },
        )
    })
}

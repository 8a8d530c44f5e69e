//! Heuristics for telling a real text layer from encoding garbage

use serde::{Deserialize, Serialize};

const GARBAGE_THRESHOLD: f64 = 0.15; // 15% garbage = failure
const PUA_THRESHOLD: f64 = 0.10; // 10% PUA = encoding issue

/// Result of text quality analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextQuality {
    pub is_valid: bool,
    pub garbage_ratio: f64,
    pub private_use_area_ratio: f64,
    pub details: String,
}

impl TextQuality {
    fn invalid(reason: &str, garbage_ratio: f64) -> Self {
        Self {
            is_valid: false,
            garbage_ratio,
            private_use_area_ratio: 0.0,
            details: reason.to_string(),
        }
    }
}

/// Analyze text for quality issues
pub fn analyze_text_quality(text: &str) -> TextQuality {
    if text.trim().is_empty() {
        return TextQuality::invalid("Empty text", 1.0);
    }

    let total_chars = text.chars().count();

    let mut replacement_chars = 0;
    let mut private_use_chars = 0;
    let mut control_chars = 0;

    for c in text.chars() {
        match c {
            '\u{FFFD}' => replacement_chars += 1,
            '\u{E000}'..='\u{F8FF}' => private_use_chars += 1,
            '\u{0000}'..='\u{001F}' if c != '\n' && c != '\r' && c != '\t' && c != '\x0C' => {
                control_chars += 1;
            }
            _ => {}
        }
    }

    let garbage_count = replacement_chars + private_use_chars + control_chars;
    let garbage_ratio = garbage_count as f64 / total_chars as f64;
    let pua_ratio = private_use_chars as f64 / total_chars as f64;

    if garbage_ratio > GARBAGE_THRESHOLD {
        return TextQuality {
            is_valid: false,
            garbage_ratio,
            private_use_area_ratio: pua_ratio,
            details: format!(
                "High garbage ratio: {:.1}% (replacement: {}, PUA: {}, control: {})",
                garbage_ratio * 100.0,
                replacement_chars,
                private_use_chars,
                control_chars
            ),
        };
    }

    if pua_ratio > PUA_THRESHOLD {
        return TextQuality {
            is_valid: false,
            garbage_ratio,
            private_use_area_ratio: pua_ratio,
            details: format!(
                "High Private Use Area ratio: {:.1}% - likely encoding failure",
                pua_ratio * 100.0
            ),
        };
    }

    TextQuality {
        is_valid: true,
        garbage_ratio,
        private_use_area_ratio: pua_ratio,
        details: format!("Valid output: {:.2}% garbage", garbage_ratio * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_clean_text() {
        let result = analyze_text_quality("Form W-2 Wage and Tax Statement 2023");
        assert!(result.is_valid);
        assert!(result.garbage_ratio < 0.01);
    }

    #[test]
    fn test_analyze_garbage_text() {
        let result = analyze_text_quality("Wages \u{FFFD}\u{FFFD}\u{FFFD}\u{FFFD}\u{FFFD}");
        assert!(!result.is_valid);
        assert!(result.garbage_ratio > 0.1);
    }

    #[test]
    fn test_analyze_pua_text() {
        // Identity-H fonts without ToUnicode come out as private use code points
        let text = "Box\u{E001}\u{E002}\u{E003}\u{E004}\u{E005}one";
        let result = analyze_text_quality(text);
        assert!(!result.is_valid);
        assert!(result.private_use_area_ratio > 0.1);
    }

    #[test]
    fn test_whitespace_only_is_invalid() {
        let result = analyze_text_quality("  \n\n\t ");
        assert!(!result.is_valid);
        assert_eq!(result.garbage_ratio, 1.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: ratios stay within [0, 1] for any input
        #[test]
        fn ratios_are_bounded(text in "\\PC{0,200}") {
            let quality = analyze_text_quality(&text);
            prop_assert!((0.0..=1.0).contains(&quality.garbage_ratio));
            prop_assert!((0.0..=1.0).contains(&quality.private_use_area_ratio));
        }

        /// Property: printable ASCII is always a valid text layer
        #[test]
        fn printable_ascii_is_valid(text in "[A-Za-z0-9$,. ]{0,80}[A-Za-z]") {
            prop_assert!(analyze_text_quality(&text).is_valid);
        }
    }
}

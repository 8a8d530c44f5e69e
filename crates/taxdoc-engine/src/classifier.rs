//! Form classification by weighted keyword and pattern scoring
//!
//! Every scored form type carries four signal tiers:
//!
//! | signal | weight |
//! |--------|--------|
//! | filename keyword (whole word) | 2 |
//! | filename pattern | 5 |
//! | content keyword (whole word) | 4 |
//! | content pattern | 10 |
//!
//! Each keyword or pattern counts once no matter how often it occurs.

use crate::config::ClassifierConfig;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use taxdoc_types::{AccountType, FormClassification, FormType};
use tracing::debug;

pub const FILENAME_KEYWORD_WEIGHT: u32 = 2;
pub const FILENAME_PATTERN_WEIGHT: u32 = 5;
pub const CONTENT_KEYWORD_WEIGHT: u32 = 4;
pub const CONTENT_PATTERN_WEIGHT: u32 = 10;

struct FormSignature {
    form_type: FormType,
    filename_keywords: Vec<Regex>,
    filename_patterns: Vec<Regex>,
    content_keywords: Vec<Regex>,
    content_patterns: Vec<Regex>,
}

impl FormSignature {
    fn new(
        form_type: FormType,
        filename_keywords: &[&str],
        filename_patterns: &[&str],
        content_keywords: &[&str],
        content_patterns: &[&str],
    ) -> Self {
        Self {
            form_type,
            filename_keywords: filename_keywords.iter().map(|k| word(k)).collect(),
            filename_patterns: filename_patterns.iter().map(|p| pattern(p)).collect(),
            content_keywords: content_keywords.iter().map(|k| word(k)).collect(),
            content_patterns: content_patterns.iter().map(|p| pattern(p)).collect(),
        }
    }

    fn score(&self, file_name: &str, text: &str) -> u32 {
        let hits = |patterns: &[Regex], haystack: &str| {
            patterns.iter().filter(|p| p.is_match(haystack)).count() as u32
        };

        let mut score = hits(&self.filename_keywords, file_name) * FILENAME_KEYWORD_WEIGHT
            + hits(&self.filename_patterns, file_name) * FILENAME_PATTERN_WEIGHT;

        if !text.is_empty() {
            score += hits(&self.content_keywords, text) * CONTENT_KEYWORD_WEIGHT
                + hits(&self.content_patterns, text) * CONTENT_PATTERN_WEIGHT;
        }
        score
    }
}

fn word(keyword: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword))).unwrap()
}

fn pattern(source: &str) -> Regex {
    Regex::new(&format!("(?i){source}")).unwrap()
}

lazy_static! {
    static ref SIGNATURES: Vec<FormSignature> = vec![
        FormSignature::new(
            FormType::W2,
            &["w2", "w-2", "wage", "wages", "payroll", "paystub"],
            &[r"\bw[-\s]?2\b"],
            &["wages", "tips", "employer", "employee", "medicare"],
            &[
                r"wage\s+and\s+tax\s+statement",
                r"social\s+security\s+wages",
                r"medicare\s+wages\s+and\s+tips",
                r"\bform\s+w-?2\b",
                r"wages,?\s*tips,?\s*(?:and\s+)?other\s+comp",
            ],
        ),
        FormSignature::new(
            FormType::Form1099,
            &["1099", "interest", "dividend", "dividends", "freelance", "contractor"],
            &[r"\b1099(?:[-\s]?(?:int|div|misc|nec|b|r|g|k))?\b"],
            &["payer", "recipient", "interest", "dividends", "nonemployee"],
            &[
                r"\bform\s+1099",
                r"\b1099-(?:int|div|misc|nec|b|r|g|k)\b",
                r"interest\s+income",
                r"ordinary\s+dividends",
                r"nonemployee\s+compensation",
                r"payer'?s\s+(?:tin|federal\s+identification\s+number)",
                r"recipient'?s\s+(?:tin|identification\s+number)",
            ],
        ),
        FormSignature::new(
            FormType::Form1040,
            &["1040", "return", "tax-return"],
            &[r"\b1040(?:[-\s]?(?:sr|nr|x))?\b", r"tax[-\s]?return"],
            &["dependents", "refund", "exemptions", "spouse"],
            &[
                r"u\.?s\.?\s+individual\s+income\s+tax\s+return",
                r"\bform\s+1040\b",
                r"adjusted\s+gross\s+income",
                r"filing\s+status",
                r"amount\s+you\s+owe",
            ],
        ),
        FormSignature::new(
            FormType::ScheduleC,
            &["schedule-c", "business", "self-employment", "sole-proprietor"],
            &[r"\bsch(?:edule)?[-\s]?c\b"],
            &["business", "profit", "expenses", "proprietor"],
            &[
                r"\bschedule\s+c\b",
                r"profit\s+or\s+loss\s+from\s+business",
                r"gross\s+receipts",
                r"net\s+profit\s+or\s+\(?loss",
                r"principal\s+business\s+or\s+profession",
            ],
        ),
        FormSignature::new(
            FormType::ScheduleE,
            &["schedule-e", "rental", "royalty", "royalties"],
            &[r"\bsch(?:edule)?[-\s]?e\b"],
            &["rental", "royalties", "rents", "tenant"],
            &[
                r"\bschedule\s+e\b",
                r"supplemental\s+income\s+and\s+loss",
                r"rents\s+received",
                r"royalties\s+received",
                r"rental\s+real\s+estate",
            ],
        ),
        FormSignature::new(
            FormType::PropertyTax,
            &["property", "assessment", "parcel", "county"],
            &[r"property[-\s]?tax", r"tax[-\s]?bill", r"\bassessment\b"],
            &["parcel", "assessed", "millage", "county", "exemption"],
            &[
                r"property\s+tax(?:es)?\b",
                r"assessed\s+value",
                r"parcel\s+(?:number|no\.?|id)",
                r"tax\s+collector",
                r"real\s+estate\s+tax",
                r"millage\s+rate",
            ],
        ),
    ];
}

/// File names are matched word-by-word; `_` counts as a separator
fn normalize_file_name(file_name: &str) -> String {
    file_name.to_lowercase().replace('_', " ")
}

/// Per-type scores in tie-break order
pub fn score_all(file_name: &str, text: &str) -> BTreeMap<FormType, u32> {
    let file_name = normalize_file_name(file_name);
    SIGNATURES
        .iter()
        .map(|sig| (sig.form_type, sig.score(&file_name, text)))
        .collect()
}

/// Classify a document from its file name and extracted text
pub fn classify(
    document_id: &str,
    file_name: &str,
    text: &str,
    account_type: AccountType,
    config: &ClassifierConfig,
) -> FormClassification {
    let scores = score_all(file_name, text.trim());

    // First-declared type wins ties
    let mut winner: Option<(FormType, u32)> = None;
    let mut runner_up = 0;
    for form_type in FormType::SCORED {
        let score = scores.get(&form_type).copied().unwrap_or(0);
        match winner {
            Some((_, best)) if score <= best => runner_up = runner_up.max(score),
            Some((_, best)) => {
                runner_up = best;
                winner = Some((form_type, score));
            }
            None => winner = Some((form_type, score)),
        }
    }

    let (form_type, score) = winner.unwrap_or((FormType::Generic, 0));

    if score < config.min_score {
        debug!(
            document_id,
            score,
            fallback = ?account_type.default_category(),
            "Classification below threshold, using account default"
        );
        return FormClassification {
            document_id: document_id.to_string(),
            form_type: FormType::Generic,
            tax_category: account_type.default_category(),
            confidence: config.base_confidence,
            per_type_scores: scores,
            is_low_confidence: true,
        };
    }

    let raw = config.base_confidence as u32 + score * 2;
    let mut confidence = raw.min(config.max_confidence as u32) as u8;

    let ambiguous = score - runner_up <= config.ambiguity_margin;
    if ambiguous {
        confidence = confidence
            .saturating_sub(config.ambiguity_penalty)
            .max(config.base_confidence);
    }

    debug!(
        document_id,
        form_type = %form_type,
        score,
        runner_up,
        confidence,
        ambiguous,
        "Document classified"
    );

    FormClassification {
        document_id: document_id.to_string(),
        form_type,
        tax_category: form_type.category(),
        confidence,
        per_type_scores: scores,
        is_low_confidence: confidence < config.low_confidence_below,
    }
}

pub mod classifier;
pub mod config;
pub mod extractors;
pub mod fields;
pub mod patterns;
pub mod pipeline;
pub mod red_flags;
pub mod store;
pub mod validator;

pub use config::{
    ClassifierConfig, ConfigError, DetectorConfig, EngineConfig, ValidationLimits,
    DEFAULT_KEYWORD_WINDOW,
};
pub use pipeline::process_document;
pub use store::{DocumentRecord, DocumentStore, InMemoryDocumentStore};

use red_flags::ScanInput;
use taxdoc_types::{
    DocumentMeta, ExtractedText, FinancialFields, FormClassification, FormType, RedFlag,
};
use tracing::debug;

/// Result of running one document through the engine
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentAnalysis {
    pub classification: FormClassification,
    pub fields: FinancialFields,
    pub red_flags: Vec<RedFlag>,
}

/// TaxDocEngine entry point
///
/// Every operation is a pure function of its arguments and the engine's
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct TaxDocEngine {
    config: EngineConfig,
}

impl TaxDocEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classify(&self, meta: &DocumentMeta, text: &str) -> FormClassification {
        classifier::classify(
            &meta.id,
            &meta.name,
            text,
            self.config.account_type,
            &self.config.classifier,
        )
    }

    pub fn parse(&self, document_id: &str, form_type: FormType, text: &str) -> FinancialFields {
        fields::parse_with(
            document_id,
            form_type,
            text,
            &self.config.limits,
            self.config.detector.keyword_window,
        )
    }

    pub fn validate(&self, fields: FinancialFields) -> FinancialFields {
        validator::validate(fields, &self.config.limits)
    }

    /// Scan `text` for red flags. `all_documents` is the session's parsed
    /// fields for the consistency checks; an entry for this document is ignored.
    pub fn detect(
        &self,
        text: &str,
        meta: &DocumentMeta,
        form_type: FormType,
        fields: &FinancialFields,
        all_documents: &[FinancialFields],
    ) -> Vec<RedFlag> {
        red_flags::detect(&ScanInput {
            text,
            meta,
            form_type,
            fields,
            all_documents,
            config: &self.config.detector,
        })
    }

    /// Classify, parse, validate and scan one extracted document
    pub fn analyze(
        &self,
        meta: &DocumentMeta,
        extracted: &ExtractedText,
        all_documents: &[FinancialFields],
    ) -> DocumentAnalysis {
        let text = extracted.text.as_str();
        if extracted.requires_ocr || extracted.error.is_some() {
            debug!(
                document_id = %meta.id,
                requires_ocr = extracted.requires_ocr,
                "Analyzing document with incomplete text"
            );
        }

        let classification = self.classify(meta, text);
        let parsed = self.parse(&meta.id, classification.form_type, text);
        let fields = self.validate(parsed);
        let red_flags = self.detect(
            text,
            meta,
            classification.form_type,
            &fields,
            all_documents,
        );

        DocumentAnalysis {
            classification,
            fields,
            red_flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use taxdoc_types::{AccountType, ExtractionMethod, RedFlagCategory, Severity, TaxCategory};

    fn meta(id: &str, name: &str) -> DocumentMeta {
        DocumentMeta {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: "application/pdf".to_string(),
        }
    }

    fn extracted(id: &str, text: &str) -> ExtractedText {
        ExtractedText::new(id, ExtractionMethod::PdfText, text.to_string())
    }

    #[test]
    fn test_analyze_w2() {
        let engine = TaxDocEngine::default();
        let text = "2023 Form W-2 Wage and Tax Statement\n\
                    Employer identification number 12-3456789\n\
                    Employee's social security number 123-45-6789\n\
                    1 Wages, tips, other compensation $52,000.00\n\
                    2 Federal income tax withheld $6,100.00\n\
                    3 Social security wages $52,000.00";
        let analysis = engine.analyze(&meta("d1", "w2.pdf"), &extracted("d1", text), &[]);

        assert_eq!(analysis.classification.form_type, FormType::W2);
        assert!(!analysis.classification.is_low_confidence);
        assert_eq!(analysis.fields.wages, Some(52000.0));
        assert_eq!(analysis.fields.income, Some(52000.0));
        assert_eq!(analysis.fields.tax_withheld, Some(6100.0));
        assert_eq!(analysis.fields.ssn.as_deref(), Some("123-45-6789"));
        assert!(analysis
            .red_flags
            .iter()
            .all(|f| f.category != RedFlagCategory::Financial));
    }

    #[test]
    fn test_failed_extraction_is_analyzed_as_empty() {
        let engine = TaxDocEngine::new(EngineConfig {
            account_type: AccountType::Business,
            ..EngineConfig::default()
        });
        let failed = ExtractedText::failed("d2", ExtractionMethod::Ocr, "no OCR engine".to_string())
            .with_requires_ocr(true);
        let analysis = engine.analyze(&meta("d2", ""), &failed, &[]);

        assert_eq!(analysis.classification.form_type, FormType::Generic);
        assert_eq!(analysis.classification.tax_category, TaxCategory::Business);
        assert!(analysis.classification.is_low_confidence);
        assert!(!analysis.fields.has_any_amount());
        assert!(analysis.red_flags.is_empty());
    }

    #[test]
    fn test_tax_lien_notice() {
        let engine = TaxDocEngine::default();
        let analysis = engine.analyze(
            &meta("d3", "notice.pdf"),
            &extracted("d3", "Notice of Federal Tax Lien. Balance due $14,200.00"),
            &[],
        );
        assert!(analysis
            .red_flags
            .iter()
            .any(|f| f.category == RedFlagCategory::Financial && f.severity == Severity::High));
        assert_eq!(analysis.fields.tax_owed, Some(14200.0));
    }

    #[test]
    fn test_keyword_window_reaches_the_parser() {
        let mut config = EngineConfig::default();
        config.detector.keyword_window = 10;
        let engine = TaxDocEngine::new(config);
        let text = "Itemized deductions, see attached schedule: $9,400.00";

        let fields = engine.parse("d4", FormType::Generic, text);
        assert_eq!(fields.deductions, None);
        let fields = TaxDocEngine::default().parse("d4", FormType::Generic, text);
        assert_eq!(fields.deductions, Some(9400.0));
    }
}

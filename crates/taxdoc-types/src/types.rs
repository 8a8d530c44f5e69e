use std::collections::BTreeMap;
use std::fmt;

/// Tax form categories a document can be classified into.
///
/// Declaration order matters: it is the tie-break order of the classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum FormType {
    #[serde(rename = "w2")]
    W2,
    #[serde(rename = "1099")]
    Form1099,
    #[serde(rename = "1040")]
    Form1040,
    #[serde(rename = "schedule-c")]
    ScheduleC,
    #[serde(rename = "schedule-e")]
    ScheduleE,
    #[serde(rename = "property-tax")]
    PropertyTax,
    #[serde(rename = "generic")]
    Generic,
}

impl FormType {
    /// Every form type that takes part in scoring, in tie-break order
    pub const SCORED: [FormType; 6] = [
        FormType::W2,
        FormType::Form1099,
        FormType::Form1040,
        FormType::ScheduleC,
        FormType::ScheduleE,
        FormType::PropertyTax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::W2 => "w2",
            FormType::Form1099 => "1099",
            FormType::Form1040 => "1040",
            FormType::ScheduleC => "schedule-c",
            FormType::ScheduleE => "schedule-e",
            FormType::PropertyTax => "property-tax",
            FormType::Generic => "generic",
        }
    }

    pub fn category(&self) -> TaxCategory {
        match self {
            FormType::W2 | FormType::Form1099 | FormType::Form1040 => TaxCategory::Income,
            FormType::ScheduleC => TaxCategory::Business,
            FormType::ScheduleE | FormType::PropertyTax => TaxCategory::Property,
            FormType::Generic => TaxCategory::General,
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad tax area of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxCategory {
    Income,
    Business,
    Property,
    General,
}

/// Kind of filer the session belongs to; picks the fallback category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountType {
    #[default]
    Individual,
    Business,
}

impl AccountType {
    pub fn default_category(&self) -> TaxCategory {
        match self {
            AccountType::Individual => TaxCategory::Income,
            AccountType::Business => TaxCategory::Business,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FormClassification {
    pub document_id: String,
    pub form_type: FormType,
    pub tax_category: TaxCategory,
    pub confidence: u8, // 0-100
    pub per_type_scores: BTreeMap<FormType, u32>,
    pub is_low_confidence: bool,
}

/// Monetary fields of [`FinancialFields`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Income,
    Wages,
    Deductions,
    TaxWithheld,
    AdjustedGrossIncome,
    TaxableIncome,
    TaxOwed,
    Refund,
    NetProfit,
}

impl FieldName {
    pub const ALL: [FieldName; 9] = [
        FieldName::Income,
        FieldName::Wages,
        FieldName::Deductions,
        FieldName::TaxWithheld,
        FieldName::AdjustedGrossIncome,
        FieldName::TaxableIncome,
        FieldName::TaxOwed,
        FieldName::Refund,
        FieldName::NetProfit,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnomalyReason {
    Negative,
    BelowMinimum,
    AboveMaximum,
    ExceedsIncome,
    WithholdingRate,
}

/// A value the validator nulled or flagged
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Anomaly {
    pub field: FieldName,
    pub reason: AnomalyReason,
    pub value: f64,
    pub nulled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldFlags {
    pub deductions_flagged: bool,
    pub tax_withheld_flagged: bool,
}

/// One component summed into `income` (e.g. a 1099-INT interest amount)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IncomeSource {
    pub label: String,
    pub amount: f64,
}

/// Amounts extracted from one document. `None` means "not found", not zero.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FinancialFields {
    pub document_id: String,
    pub income: Option<f64>,
    pub wages: Option<f64>,
    pub deductions: Option<f64>,
    pub tax_withheld: Option<f64>,
    pub adjusted_gross_income: Option<f64>,
    pub taxable_income: Option<f64>,
    pub tax_owed: Option<f64>,
    pub refund: Option<f64>,
    pub net_profit: Option<f64>,
    pub ssn: Option<String>, // normalized XXX-XX-XXXX
    pub tax_year: Option<i32>,
    #[serde(default)]
    pub income_sources: Vec<IncomeSource>,
    #[serde(default)]
    pub flags: FieldFlags,
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
}

impl FinancialFields {
    pub fn new(document_id: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: FieldName) -> Option<f64> {
        match field {
            FieldName::Income => self.income,
            FieldName::Wages => self.wages,
            FieldName::Deductions => self.deductions,
            FieldName::TaxWithheld => self.tax_withheld,
            FieldName::AdjustedGrossIncome => self.adjusted_gross_income,
            FieldName::TaxableIncome => self.taxable_income,
            FieldName::TaxOwed => self.tax_owed,
            FieldName::Refund => self.refund,
            FieldName::NetProfit => self.net_profit,
        }
    }

    pub fn set(&mut self, field: FieldName, value: Option<f64>) {
        let slot = match field {
            FieldName::Income => &mut self.income,
            FieldName::Wages => &mut self.wages,
            FieldName::Deductions => &mut self.deductions,
            FieldName::TaxWithheld => &mut self.tax_withheld,
            FieldName::AdjustedGrossIncome => &mut self.adjusted_gross_income,
            FieldName::TaxableIncome => &mut self.taxable_income,
            FieldName::TaxOwed => &mut self.tax_owed,
            FieldName::Refund => &mut self.refund,
            FieldName::NetProfit => &mut self.net_profit,
        };
        *slot = value;
    }

    /// True when at least one monetary field was found
    pub fn has_any_amount(&self) -> bool {
        FieldName::ALL.iter().any(|f| self.get(*f).is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedFlagCategory {
    Financial,
    Compliance,
    Documentation,
    Consistency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextPosition {
    pub start_offset: usize, // Byte offset in the extracted text
    pub end_offset: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RedFlag {
    pub id: String, // rule identifier, e.g. "financial.tax-lien"
    pub category: RedFlagCategory,
    pub severity: Severity,
    pub message: String,
    pub document_id: String,
    pub snippet: Option<String>,
    pub text_position: Option<TextPosition>, // Position for highlighting
}

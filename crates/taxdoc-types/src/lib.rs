pub mod document;
pub mod error;
pub mod types;

pub use document::{hash_document, DocumentMeta, ExtractedText, ExtractionMethod, RawDocument};
pub use error::{StoreError, UploadError};
pub use types::{
    AccountType, Anomaly, AnomalyReason, FieldFlags, FieldName, FinancialFields,
    FormClassification, FormType, IncomeSource, RedFlag, RedFlagCategory, Severity, TaxCategory,
    TextPosition,
};

use pretty_assertions::assert_eq;
use taxdoc_engine::{
    process_document, DocumentStore, EngineConfig, InMemoryDocumentStore, TaxDocEngine,
};
use taxdoc_types::{
    DocumentMeta, ExtractedText, ExtractionMethod, FormType, RawDocument, RedFlag,
};

const W2_TEXT: &str = "2023 Form W-2 Wage and Tax Statement\n\
    Employer identification number 12-3456789\n\
    Employee's social security number 123-45-6789\n\
    1 Wages, tips, other compensation $61,250.00\n\
    2 Federal income tax withheld $7,940.00\n\
    Date issued 01/31/2024";

const INT_TEXT: &str = "2023 Form 1099-INT\n\
    Payer's TIN 98-7654321\n\
    Recipient's TIN 123-45-6789\n\
    1 Interest income $1,318.22\n\
    Date 01/15/2024";

fn engine() -> TaxDocEngine {
    TaxDocEngine::new(EngineConfig::from_json(r#"{"detector": {"reference_year": 2024}}"#).unwrap())
}

fn upload(name: &str, text: &str) -> (DocumentMeta, ExtractedText) {
    let raw = RawDocument::new(name, "text/plain", text.as_bytes().to_vec());
    let extracted = ExtractedText::new(&raw.id, ExtractionMethod::Plain, text.to_string());
    (raw.meta(), extracted)
}

fn flag_ids(flags: &[RedFlag]) -> Vec<&str> {
    flags.iter().map(|f| f.id.as_str()).collect()
}

#[test]
fn test_identical_input_gives_identical_analysis() {
    let engine = engine();
    let (meta, extracted) = upload("w2.txt", W2_TEXT);

    let first = engine.analyze(&meta, &extracted, &[]);
    let second = engine.analyze(&meta, &extracted, &[]);
    assert_eq!(first, second);
    assert_eq!(first.classification.form_type, FormType::W2);
    assert_eq!(first.fields.income, Some(61250.0));
}

#[test]
fn test_red_flags_follow_the_session_set() {
    let engine = engine();
    let mut store = InMemoryDocumentStore::new();
    let (w2_meta, w2_text) = upload("w2.txt", W2_TEXT);
    let (int_meta, int_text) = upload("1099-int.txt", INT_TEXT);

    let w2_alone = process_document(&engine, &w2_meta, &w2_text, &mut store).unwrap();
    assert!(!flag_ids(&w2_alone.red_flags).contains(&"consistency.duplicate-ssn"));

    let interest = process_document(&engine, &int_meta, &int_text, &mut store).unwrap();
    assert_eq!(interest.classification.form_type, FormType::Form1099);
    assert_eq!(interest.fields.income, Some(1318.22));
    assert!(flag_ids(&interest.red_flags).contains(&"consistency.duplicate-ssn"));

    // Same input, larger session: only the consistency flags change
    let w2_again = process_document(&engine, &w2_meta, &w2_text, &mut store).unwrap();
    assert_eq!(w2_again.classification, w2_alone.classification);
    assert_eq!(w2_again.fields, w2_alone.fields);
    assert!(flag_ids(&w2_again.red_flags).contains(&"consistency.duplicate-ssn"));
    assert_eq!(w2_again.red_flags.len(), w2_alone.red_flags.len() + 1);

    assert_eq!(store.list().unwrap().len(), 2);
}

#[test]
fn test_reupload_reuses_content_id() {
    let (first, _) = upload("w2.txt", W2_TEXT);
    let (second, _) = upload("renamed.txt", W2_TEXT);
    assert_eq!(first.id, second.id);
}

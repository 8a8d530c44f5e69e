//! taxdoc command-line harness
//!
//! Runs uploaded tax documents through the full pipeline and prints one JSON
//! record per document:
//!
//! - Upload gate (size, type, non-empty)
//! - Text extraction, in parallel across files
//! - Classification, field parsing, validation, red-flag scanning
//!
//! Documents are analyzed in input order against an in-memory session store,
//! so the cross-document checks of later files see the earlier ones.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use taxdoc_engine::{
    process_document, DocumentRecord, EngineConfig, InMemoryDocumentStore, TaxDocEngine,
};
use taxdoc_extract::{TextExtractor, UploadLimits};
use taxdoc_types::AccountType;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod ingest;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AccountTypeArg {
    Individual,
    Business,
}

impl From<AccountTypeArg> for AccountType {
    fn from(arg: AccountTypeArg) -> Self {
        match arg {
            AccountTypeArg::Individual => AccountType::Individual,
            AccountTypeArg::Business => AccountType::Business,
        }
    }
}

/// Command-line arguments for the taxdoc harness
#[derive(Parser, Debug)]
#[command(name = "taxdoc-cli")]
#[command(about = "Classify, parse and scan tax documents")]
struct Args {
    /// Documents to analyze (PDF, image or plain text)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Filer type used when a document cannot be classified
    #[arg(long, value_enum)]
    account_type: Option<AccountTypeArg>,

    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Calendar year for tax-year staleness checks
    #[arg(long)]
    reference_year: Option<i32>,

    /// Maximum upload size in bytes
    #[arg(long)]
    max_bytes: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_path(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(account_type) = self.account_type {
            config.account_type = account_type.into();
        }
        if let Some(year) = self.reference_year {
            config.detector.reference_year = year;
        }
        config.check()?;
        Ok(config)
    }

    fn upload_limits(&self) -> UploadLimits {
        let mut limits = UploadLimits::default();
        if let Some(max_bytes) = self.max_bytes {
            limits.max_bytes = max_bytes;
        }
        limits
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout carries the JSON output
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let engine = TaxDocEngine::new(args.engine_config()?);
    let documents = ingest::load_documents(&args.files, &args.upload_limits()).await?;
    info!(
        accepted = documents.len(),
        requested = args.files.len(),
        "Documents loaded"
    );

    let extractor = Arc::new(TextExtractor::new());
    info!("OCR engine: {}", extractor.ocr_engine());
    let extracted = ingest::extract_all(extractor, documents).await;

    let mut store = InMemoryDocumentStore::new();
    let mut records: Vec<DocumentRecord> = Vec::with_capacity(extracted.len());
    for (document, text) in &extracted {
        if text.requires_ocr {
            warn!(file = %document.name, "Document needs OCR; re-upload a clearer copy");
        }
        let record = process_document(&engine, &document.meta(), text, &mut store)
            .with_context(|| format!("Failed to store {}", document.name))?;
        records.push(record);
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{output}");

    Ok(())
}

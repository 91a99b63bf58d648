//! Validate command - run the validation engine on one local file.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;

use grado_core::models::record::DocumentStatus;
use grado_core::{AutoDetector, DictionaryStore, DocumentSlot, DownloadedFile, ValidationEngine, ValidationOutcome};

use super::load_config;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Document slot (cedula, diploma_bachiller, prueba_tt, icfes, ...)
    #[arg(short, long)]
    slot: DocumentSlot,

    /// Document file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let file = DownloadedFile::from_path(&args.input)?;

    let store = DictionaryStore::from_config(&config.dictionaries);
    let detector = AutoDetector::from_config(&config.ocr)?;
    let engine = ValidationEngine::new(&store, detector, config.validation.clone());

    let outcome = engine.validate(&file, args.slot);
    let status = if outcome.is_valid() {
        DocumentStatus::Valid
    } else {
        DocumentStatus::ManualReview
    };

    match args.format {
        OutputFormat::Json => {
            let value = match &outcome {
                ValidationOutcome::Valid { method, fields } => json!({
                    "slot": args.slot,
                    "status": status,
                    "method": method,
                    "fields": fields,
                }),
                ValidationOutcome::NeedsManualReview { reason } => json!({
                    "slot": args.slot,
                    "status": status,
                    "reason": reason,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => print_text(args.slot, status, &outcome),
    }

    Ok(())
}

fn print_text(slot: DocumentSlot, status: DocumentStatus, outcome: &ValidationOutcome) {
    match outcome {
        ValidationOutcome::Valid { method, fields } => {
            println!("{} {}: {} ({})", style("✓").green(), slot, status, method);
            for (field, value) in fields {
                println!("  {:<24} {}", format!("{:?}", field), value);
            }
        }
        ValidationOutcome::NeedsManualReview { reason } => {
            println!("{} {}: {}", style("!").yellow(), slot, status);
            println!("  {}", reason);
        }
    }
}

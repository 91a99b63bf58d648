//! Process command - validate the attachments of a form submission.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use grado_core::models::record::OutputRecord;
use grado_core::{AutoDetector, DictionaryStore, DocumentSlot, DownloadedFile, RecordAssembler, Submission};

use super::load_config;
use crate::drive::{download_all, DriveClient};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Form submission (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Use a local file for a slot instead of downloading, as SLOT=PATH
    #[arg(short, long = "file", value_name = "SLOT=PATH", value_parser = parse_slot_file)]
    files: Vec<(DocumentSlot, PathBuf)>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_slot_file(value: &str) -> Result<(DocumentSlot, PathBuf), String> {
    let (slot, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SLOT=PATH, got {:?}", value))?;
    Ok((slot.trim().parse()?, PathBuf::from(path.trim())))
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let submission = Submission::from_file(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;

    info!("Processing submission {}", submission.id);

    let store = DictionaryStore::for_submission(&config.dictionaries, &submission)?;

    let detector = AutoDetector::from_config(&config.ocr)?;
    let assembler = RecordAssembler::new(&store, detector, config.validation.clone());

    let record = if args.files.is_empty() {
        let urls = submission.document_urls();
        if urls.is_empty() {
            anyhow::bail!("No document URLs found in submission {}", submission.id);
        }
        let work_dir = tempfile::tempdir()?;
        let client = DriveClient::new(&config.download, work_dir.path())?;

        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("##-"),
        );

        let batch = download_all(&client, &urls, &pb).await;
        pb.finish_and_clear();

        for (slot, error) in &batch.failures {
            eprintln!("{} {}: {}", style("✗").red(), slot, error);
        }
        let downloads = batch.into_files()?;

        // work_dir lives until the record is assembled
        assembler.assemble_downloads(&submission, downloads)
    } else {
        let mut files = BTreeMap::new();
        for (slot, path) in &args.files {
            let file = DownloadedFile::from_path(path)
                .with_context(|| format!("Input file not found: {}", path.display()))?;
            files.insert(*slot, file);
        }
        assembler.assemble(&submission, &files)
    };

    write_record(&record, args.output.as_ref())?;

    info!("Processed in {}ms", start.elapsed().as_millis());
    Ok(())
}

fn write_record(record: &OutputRecord, output: Option<&PathBuf>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(record)?;

    if let Some(output_path) = output {
        fs::write(output_path, &json)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

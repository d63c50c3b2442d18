//! Extract command - process every certificate in a folder into one CSV.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use furusato_core::{ExtractionContext, OutputRecord, SourceRegistry};

use super::{load_config, split_command};
use crate::output::write_csv;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input directory or glob pattern
    #[arg(default_value = "input")]
    input: String,

    /// Output CSV file
    #[arg(short, long, default_value = "output/output.csv")]
    output: PathBuf,

    /// Number of documents processed in parallel
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// NER command (overrides config), e.g. "python ginza_ner.py"
    #[arg(long)]
    ner_command: Option<String>,
}

/// Result of processing a single document.
struct DocumentResult {
    path: PathBuf,
    records: Vec<OutputRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(command) = &args.ner_command {
        config.ner.command = split_command(command);
    }

    let registry = Arc::new(SourceRegistry::from_config(&config.ocr));
    let files = collect_inputs(&args.input, &registry)?;

    if files.is_empty() {
        warn!("No supported documents found in {}", args.input);
        println!(
            "{} No supported documents found in {}",
            style("!").yellow(),
            args.input
        );
        return Ok(());
    }

    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        files.len()
    );

    let context = Arc::new(ExtractionContext::from_config(&config)?);

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    // Documents run in parallel; results are collected in input order
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let semaphore = Arc::clone(&semaphore);
        let context = Arc::clone(&context);
        let registry = Arc::clone(&registry);

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            tokio::task::spawn_blocking(move || process_document(path, &context, &registry)).await
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await??;
        match &result.error {
            Some(error) => warn!("Failed to process {}: {}", result.path.display(), error),
            None => info!(
                "{}: {} pages in {}ms",
                result.path.display(),
                result.records.len(),
                result.processing_time_ms
            ),
        }
        results.push(result);
        progress.inc(1);
    }

    progress.finish_with_message("Complete");

    let records: Vec<OutputRecord> = results
        .iter()
        .flat_map(|r| r.records.iter().cloned())
        .collect();

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = BufWriter::new(File::create(&args.output)?);
    write_csv(file, &records, &config.output)?;

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let empty_pages = records.iter().filter(|r| r.is_empty()).count();

    println!();
    println!(
        "{} Processed {} documents ({} pages) in {:?}",
        style("✓").green(),
        results.len(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} written, {} pages with no fields, {} documents failed",
        style(args.output.display()).green(),
        style(empty_pages).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    info!("Done in {:?}", start.elapsed());
    Ok(())
}

/// Supported files in a directory (sorted by name), or glob matches.
fn collect_inputs(input: &str, registry: &SourceRegistry) -> anyhow::Result<Vec<PathBuf>> {
    let dir = Path::new(input);

    let mut files: Vec<PathBuf> = if dir.is_dir() {
        fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect()
    } else {
        glob(input)?.filter_map(|r| r.ok()).collect()
    };

    files.retain(|p| registry.supports(p));
    files.sort();
    Ok(files)
}

fn process_document(
    path: PathBuf,
    context: &ExtractionContext,
    registry: &SourceRegistry,
) -> DocumentResult {
    let start = Instant::now();
    let document = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    info!("========= Processing {} =========", document);

    let (records, error) = match registry.page_texts(&path) {
        Ok(pages) => (context.extract_document(&document, &pages), None),
        Err(e) => (Vec::new(), Some(e.to_string())),
    };

    DocumentResult {
        path,
        records,
        error,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}

//! Page command - extract fields from a single document and print them.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use furusato_core::{ExtractionContext, OutputRecord, SourceRegistry};

use super::{load_config, split_command};
use crate::output::{format_csv, format_text};

/// Arguments for the page command.
#[derive(Args)]
pub struct PageArgs {
    /// Input file (txt, PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Only this page (1-indexed)
    #[arg(short, long)]
    page: Option<u32>,

    /// NER command (overrides config)
    #[arg(long)]
    ner_command: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: PageArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(command) = &args.ner_command {
        config.ner.command = split_command(command);
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let registry = SourceRegistry::from_config(&config.ocr);
    let context = ExtractionContext::from_config(&config)?;

    let pages = registry.page_texts(&args.input)?;
    debug!("{} has {} pages", args.input.display(), pages.len());

    let document = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let mut records = context.extract_document(&document, &pages);
    if let Some(page) = args.page {
        if page == 0 || page as usize > pages.len() {
            anyhow::bail!("Page {} out of range (document has {} pages)", page, pages.len());
        }
        records.retain(|r| r.page == page);
    }

    let output = format_records(&records, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_records(records: &[OutputRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

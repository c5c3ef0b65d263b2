//! Process command - read one quotation image.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use dealerdoc_core::vision::save_annotated;
use dealerdoc_core::DocumentProcessor;

use super::{build_recognizer, format_record, load_config, process_document, LineSource, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input quotation image (png, jpg)
    #[arg(required = true)]
    input: PathBuf,

    /// Pre-recognized lines (JSON) to use instead of running OCR
    #[arg(short, long)]
    lines: Option<PathBuf>,

    /// Write a copy of the image with stamp/signature boxes drawn
    #[arg(short, long)]
    annotate: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Show confidence and timing after the output
    #[arg(long)]
    show_confidence: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if let Some(lines) = &args.lines {
        if !lines.exists() {
            anyhow::bail!("Lines file not found: {}", lines.display());
        }
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);

    let engine = match &args.lines {
        Some(_) => None,
        None => {
            pb.set_message("Loading OCR models...");
            Some(build_recognizer(args.model_dir.as_ref(), &config)?)
        }
    };

    let source = match (&args.lines, &engine) {
        (Some(path), _) => LineSource::File(path),
        (None, Some(engine)) => LineSource::Engine(engine),
        (None, None) => anyhow::bail!("No line source available"),
    };

    pb.set_message("Reading document...");
    let processor = DocumentProcessor::new(&config);
    let (record, image) = process_document(&args.input, source, &processor).await?;
    pb.finish_and_clear();

    if let Some(annotate_path) = &args.annotate {
        match &image {
            Some(image) => {
                save_annotated(image, &record.markers(), annotate_path)?;
                eprintln!(
                    "{} Annotated image written to {}",
                    style("✓").green(),
                    annotate_path.display()
                );
            }
            None => eprintln!(
                "{} Image could not be decoded, nothing to annotate",
                style("!").yellow()
            ),
        }
    }

    let output = format_record(&record, args.format)?;

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

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "{} Confidence: {:.2}, missing: {:?}",
            style("ℹ").blue(),
            record.confidence,
            record.fields.extracted.missing_fields()
        );
        eprintln!(
            "{} Processing time: {:.2}s",
            style("ℹ").blue(),
            record.processing_time_sec
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

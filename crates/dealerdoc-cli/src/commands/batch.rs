//! Batch processing command for a folder of quotation images.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use dealerdoc_core::vision::save_annotated;
use dealerdoc_core::{DocumentProcessor, PureOcrEngine, ResultRecord};

use super::{
    build_recognizer, csv_row, format_record, is_image, load_config, process_document, LineSource,
    OutputFormat, CSV_HEADER,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory or glob pattern
    #[arg(required = true)]
    input: String,

    /// Directory of pre-recognized lines, one `<image stem>.json` per image
    #[arg(short, long)]
    lines_dir: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Process at most this many documents
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Write annotated copies of each image into this directory
    #[arg(short, long)]
    annotate_dir: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<ResultRecord>,
    error: Option<String>,
}

/// Images named by a directory or glob, sorted by path.
fn collect_inputs(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let as_path = Path::new(input);
    let mut files: Vec<PathBuf> = if as_path.is_dir() {
        fs::read_dir(as_path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect()
    } else {
        glob(input)?.filter_map(|r| r.ok()).collect()
    };

    files.retain(|p| p.is_file() && is_image(p));
    files.sort();
    Ok(files)
}

fn lines_file(lines_dir: &Path, image: &Path) -> PathBuf {
    let stem = image.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    lines_dir.join(format!("{}.json", stem))
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files = collect_inputs(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching images found for: {}", args.input);
    }
    if let Some(limit) = args.limit {
        files.truncate(limit);
    }

    println!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }
    if let Some(ref annotate_dir) = args.annotate_dir {
        fs::create_dir_all(annotate_dir)?;
    }

    // One engine for the whole batch
    let engine: Option<PureOcrEngine> = match &args.lines_dir {
        Some(_) => None,
        None => Some(build_recognizer(args.model_dir.as_ref(), &config)?),
    };
    let processor = DocumentProcessor::new(&config);

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let result = process_single_file(&path, &args, engine.as_ref(), &processor).await;

        match result {
            Ok(record) => results.push(ProcessResult {
                path,
                record: Some(record),
                error: None,
            }),
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        record: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(record) = &result.record {
                let stem = result.path.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
                let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));
                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if !successful.is_empty() {
        let mean = successful
            .iter()
            .filter_map(|r| r.record.as_ref())
            .map(|r| r.confidence)
            .sum::<f64>()
            / successful.len() as f64;
        println!("{} Mean confidence: {:.2}", style("ℹ").blue(), mean);
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn process_single_file(
    path: &Path,
    args: &BatchArgs,
    engine: Option<&PureOcrEngine>,
    processor: &DocumentProcessor,
) -> anyhow::Result<ResultRecord> {
    let corpus_path = args.lines_dir.as_deref().map(|dir| lines_file(dir, path));

    let source = match (&corpus_path, engine) {
        (Some(corpus_path), _) => {
            if !corpus_path.exists() {
                anyhow::bail!("Lines file not found: {}", corpus_path.display());
            }
            LineSource::File(corpus_path)
        }
        (None, Some(engine)) => LineSource::Engine(engine),
        (None, None) => anyhow::bail!("No line source available"),
    };

    let (record, image) = process_document(path, source, processor).await?;

    if let (Some(annotate_dir), Some(image)) = (&args.annotate_dir, &image) {
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("document.png");
        save_annotated(image, &record.markers(), &annotate_dir.join(name))?;
    }

    Ok(record)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = CSV_HEADER.to_vec();
    header.extend(["status", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        match &result.record {
            Some(record) => {
                let mut row = csv_row(record);
                row.extend(["success".to_string(), String::new()]);
                wtr.write_record(&row)?;
            }
            None => {
                let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
                let mut row = vec![String::new(); CSV_HEADER.len()];
                row[0] = filename.to_string();
                row.extend([
                    "error".to_string(),
                    result.error.clone().unwrap_or_default(),
                ]);
                wtr.write_record(&row)?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_file_uses_image_stem() {
        assert_eq!(
            lines_file(Path::new("lines"), Path::new("scans/q_001.png")),
            PathBuf::from("lines/q_001.json")
        );
    }

    #[test]
    fn test_collect_inputs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "notes.txt", "c.jpeg"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let files = collect_inputs(dir.path().to_str().unwrap()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png", "c.jpeg"]);
    }
}

//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use image::DynamicImage;
use tracing::{debug, info, warn};

use dealerdoc_core::models::config::DealerDocConfig;
use dealerdoc_core::{DocumentProcessor, LineCorpus, PureOcrEngine, ResultRecord, TextRecognizer};

/// Image extensions accepted as quotation scans.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Load the config named by `-c`, else the user config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DealerDocConfig> {
    if let Some(path) = config_path {
        return DealerDocConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let user_config = config::default_config_path();
    if user_config.exists() {
        debug!("Using config at {}", user_config.display());
        return DealerDocConfig::from_file(&user_config)
            .with_context(|| format!("Failed to load config from {}", user_config.display()));
    }

    Ok(DealerDocConfig::default())
}

/// Build the recognition engine once from `--model-dir` or the config.
pub fn build_recognizer(model_dir: Option<&PathBuf>, config: &DealerDocConfig) -> anyhow::Result<PureOcrEngine> {
    let model_dir = model_dir.cloned().unwrap_or_else(|| config.models.model_dir.clone());

    PureOcrEngine::from_dir(&model_dir, &config.models, config.ocr.clone()).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load OCR models from {}: {}\n\n\
             Place {}, {} and {} there, or pass --lines with a pre-recognized corpus.",
            model_dir.display(),
            e,
            config.models.detection_model,
            config.models.recognition_model,
            config.models.dictionary
        )
    })
}

/// Where a document's recognized lines come from.
pub enum LineSource<'a> {
    /// Pre-recognized corpus file.
    File(&'a Path),
    /// Run the recognition engine on the decoded image.
    Engine(&'a PureOcrEngine),
}

/// Full per-document flow: decode, recognize and detect concurrently, then
/// extract and score.
///
/// An undecodable image is an error when the engine has to read it; with a
/// corpus file it only means no markers.
pub async fn process_document(
    image_path: &Path,
    lines: LineSource<'_>,
    processor: &DocumentProcessor,
) -> anyhow::Result<(ResultRecord, Option<DynamicImage>)> {
    let started = Instant::now();
    let doc_id = doc_id(image_path);

    let image = match (image::open(image_path), &lines) {
        (Ok(image), _) => Some(image),
        (Err(e), LineSource::Engine(_)) => {
            anyhow::bail!("Failed to decode {}: {}", image_path.display(), e)
        }
        (Err(e), LineSource::File(_)) => {
            warn!("Could not decode {}: {}", image_path.display(), e);
            None
        }
    };

    // Detection only needs the pixels, so it runs beside recognition.
    let detector = processor.clone();
    let detect_input = image.clone();
    let markers = tokio::task::spawn_blocking(move || detector.detect_markers(detect_input.as_ref()));

    let corpus = match lines {
        LineSource::File(path) => LineCorpus::from_json_file(path)
            .with_context(|| format!("Failed to read lines from {}", path.display()))?,
        LineSource::Engine(engine) => {
            let image = image
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("No image to recognize"))?;
            engine
                .recognize(image)
                .map_err(|e| anyhow::anyhow!("OCR failed for {}: {}", image_path.display(), e))?
        }
    };

    let markers = markers.await.context("Marker detection task failed")?;
    info!("{}: {} recognized lines", doc_id, corpus.len());

    let record = processor.assemble(started, &doc_id, &corpus, markers);
    Ok((record, image))
}

/// Document identifier: the file name of the scan.
pub fn doc_id(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn bbox_cell(bbox: Option<dealerdoc_core::Rectangle>) -> String {
    bbox.map(|r| format!("{} {} {} {}", r.x1, r.y1, r.x2, r.y2))
        .unwrap_or_default()
}

pub const CSV_HEADER: [&str; 11] = [
    "doc_id",
    "dealer_name",
    "model_name",
    "horse_power",
    "asset_cost",
    "stamp_present",
    "stamp_bbox",
    "signature_present",
    "signature_bbox",
    "confidence",
    "processing_time_sec",
];

/// One CSV row per record, aligned with [`CSV_HEADER`].
pub fn csv_row(record: &ResultRecord) -> Vec<String> {
    let fields = &record.fields.extracted;
    vec![
        record.doc_id.clone(),
        opt(&fields.dealer_name),
        opt(&fields.model_name),
        opt(&fields.horse_power),
        opt(&fields.asset_cost),
        record.fields.stamp.present().to_string(),
        bbox_cell(record.fields.stamp.bbox()),
        record.fields.signature.present().to_string(),
        bbox_cell(record.fields.signature.bbox()),
        format!("{:.2}", record.confidence),
        format!("{:.2}", record.processing_time_sec),
    ]
}

/// Output format for a single record.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_record(record: &ResultRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(CSV_HEADER)?;
            wtr.write_record(csv_row(record))?;
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_text(record: &ResultRecord) -> String {
    let fields = &record.fields.extracted;
    let show = |value: String| if value.is_empty() { "-".to_string() } else { value };
    let marker = |present: bool| if present { "present" } else { "absent" };

    let mut output = String::new();
    output.push_str(&format!("Document: {}\n\n", record.doc_id));
    output.push_str(&format!("  Dealer:     {}\n", show(opt(&fields.dealer_name))));
    output.push_str(&format!("  Model:      {}\n", show(opt(&fields.model_name))));
    output.push_str(&format!("  HP:         {}\n", show(opt(&fields.horse_power))));
    output.push_str(&format!("  Asset cost: {}\n", show(opt(&fields.asset_cost))));
    output.push_str(&format!("  Stamp:      {}\n", marker(record.fields.stamp.present())));
    output.push_str(&format!("  Signature:  {}\n", marker(record.fields.signature.present())));
    output.push('\n');
    output.push_str(&format!("Confidence: {:.2}\n", record.confidence));
    output.push_str(&format!("Time: {:.2}s\n", record.processing_time_sec));
    output
}

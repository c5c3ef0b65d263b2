//! Core library for dealer quotation document processing.
//!
//! This crate provides:
//! - A line corpus boundary for recognized text (with a PaddleOCR-backed engine)
//! - Rule-based field extraction (dealer name, model, horse power, asset cost)
//! - Stamp and signature detection on the document image
//! - A confidence score summarizing extraction completeness

pub mod confidence;
pub mod error;
pub mod fields;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod vision;

pub use confidence::{compute_confidence, ConfidenceWeights, FieldPresence};
pub use error::{DealerDocError, OcrError, Result};
pub use fields::{
    clean_model_name, extract_asset_cost, extract_dealer_name, extract_horse_power,
    extract_model_name, FieldExtractor,
};
pub use models::config::DealerDocConfig;
pub use models::record::{DetectionResult, ExtractedFields, Rectangle, ResultRecord, VisualMarkers};
pub use ocr::{LineCorpus, RecognizedLine, TextRecognizer};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pipeline::DocumentProcessor;
pub use vision::{detect_markers, detect_signature, detect_stamp, SignatureDetector, StampDetector};

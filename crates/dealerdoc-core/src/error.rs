//! Error types for the dealerdoc-core library.
//!
//! Field extraction and marker detection never fail: a missing value is an
//! absent result. Errors only come from the I/O boundary around the core.

use thiserror::Error;

/// Main error type for the dealerdoc library.
#[derive(Error, Debug)]
pub enum DealerDocError {
    /// Text recognition error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image decode/encode error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Line corpus or configuration (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the text recognition engine.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load recognition models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Result type for the dealerdoc library.
pub type Result<T> = std::result::Result<T, DealerDocError>;

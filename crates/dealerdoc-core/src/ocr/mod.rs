//! Recognized-text boundary: the line corpus and the recognition engine seam.
//!
//! Line order is the engine's scan order and is meaningful downstream
//! (dealer window, tie-breaks), so nothing in this module re-sorts lines.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// One line of recognized text with its geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedLine {
    /// Recognized text content.
    pub text: String,

    /// Quadrilateral corners (x, y), in engine order (usually TL, TR, BR, BL).
    #[serde(alias = "bbox", default)]
    pub polygon: [[f32; 2]; 4],

    /// Recognition confidence (0.0 - 1.0).
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 {
    1.0
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>, polygon: [[f32; 2]; 4], confidence: f32) -> Self {
        Self {
            text: text.into(),
            polygon,
            confidence,
        }
    }

    /// A line without geometry, as produced by text-only sources.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(text, [[0.0; 2]; 4], 1.0)
    }
}

/// Ordered recognized lines of a single document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineCorpus {
    lines: Vec<RecognizedLine>,
}

impl LineCorpus {
    /// Build a corpus from plain text lines, keeping their order.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: texts.into_iter().map(RecognizedLine::from_text).collect(),
        }
    }

    /// Parse a JSON array of `{ "text", "bbox" | "polygon", "confidence" }` objects.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a corpus previously written by a recognition engine.
    pub fn from_json_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecognizedLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop lines whose confidence is below `min_confidence`, preserving order.
    pub fn retain_confident(&mut self, min_confidence: f32) {
        self.lines.retain(|l| l.confidence >= min_confidence);
    }
}

impl FromIterator<RecognizedLine> for LineCorpus {
    fn from_iter<I: IntoIterator<Item = RecognizedLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LineCorpus {
    type Item = &'a RecognizedLine;
    type IntoIter = std::slice::Iter<'a, RecognizedLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// A text recognition engine producing a line corpus from an image.
///
/// Engines are expensive to build: construct one per process and pass it
/// to every document.
pub trait TextRecognizer {
    /// Recognize text lines in an already decoded image.
    fn recognize(&self, image: &DynamicImage) -> Result<LineCorpus, OcrError>;
}

//! Stamp and signature detection from contour shape priors.
//!
//! Both detectors crop a fixed region of the page, binarize it with an
//! Otsu threshold and take the first external contour (in scan order) that
//! matches their shape rule. Stamps are dense, roughly square ink blobs;
//! signatures are long thin strokes. A missing image means no markers.

mod annotate;
mod contours;
mod roi;

pub use annotate::{annotate, save_annotated};
pub use contours::{binarize_inverted, external_contours, ContourRegion};
pub use roi::RegionOfInterest;

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::record::{DetectionResult, VisualMarkers};

/// Stamp detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampConfig {
    /// Searched region (default: bottom-right 40% x 40%).
    pub roi: RegionOfInterest,

    /// A contour must enclose strictly more than this many pixels.
    pub min_area: f64,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            roi: RegionOfInterest::new(0.6, 1.0, 0.6, 1.0),
            min_area: 1000.0,
        }
    }
}

/// Signature detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Searched region (default: bottom 35%, central 80% of the width).
    pub roi: RegionOfInterest,

    /// A contour must enclose strictly more than this many pixels.
    pub min_area: f64,

    /// Bounding width / height must be strictly greater than this.
    pub min_aspect_ratio: f64,

    /// Bounding height must be strictly below this many pixels.
    pub max_height: u32,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            roi: RegionOfInterest::new(0.65, 1.0, 0.1, 0.9),
            min_area: 300.0,
            min_aspect_ratio: 3.0,
            max_height: 120,
        }
    }
}

/// Crop `roi` out of `image`, binarize it and return the first contour
/// accepted by `accept`, translated to image coordinates.
fn first_matching_contour<F>(image: &DynamicImage, roi: &RegionOfInterest, accept: F) -> DetectionResult
where
    F: Fn(&ContourRegion) -> bool,
{
    let (width, height) = image.dimensions();
    let Some(bounds) = roi.pixel_bounds(width, height) else {
        debug!("Region of interest is empty for {}x{} image", width, height);
        return DetectionResult::not_present();
    };

    let gray = image
        .crop_imm(bounds.x1, bounds.y1, bounds.width(), bounds.height())
        .to_luma8();
    let binary = binarize_inverted(&gray);
    let contours = external_contours(&binary);

    debug!("{} external contours in region {:?}", contours.len(), bounds);

    contours
        .iter()
        .find(|c| accept(c))
        .map(|c| c.rect.translate(bounds.x1, bounds.y1))
        .into()
}

/// Detects an authority stamp in the bottom-right of the page.
#[derive(Debug, Clone, Default)]
pub struct StampDetector {
    config: StampConfig,
}

impl StampDetector {
    pub fn new(config: StampConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, image: &DynamicImage) -> DetectionResult {
        let result = first_matching_contour(image, &self.config.roi, |c| c.area > self.config.min_area);
        debug!("Stamp: {:?}", result.bbox());
        result
    }
}

/// Detects a handwritten signature in the bottom band of the page.
#[derive(Debug, Clone, Default)]
pub struct SignatureDetector {
    config: SignatureConfig,
}

impl SignatureDetector {
    pub fn new(config: SignatureConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, image: &DynamicImage) -> DetectionResult {
        let cfg = &self.config;
        let result = first_matching_contour(image, &cfg.roi, |c| {
            c.area > cfg.min_area && c.aspect_ratio() > cfg.min_aspect_ratio && c.height() < cfg.max_height
        });
        debug!("Signature: {:?}", result.bbox());
        result
    }
}

/// Detect a stamp with the default parameters.
pub fn detect_stamp(image: &DynamicImage) -> DetectionResult {
    StampDetector::default().detect(image)
}

/// Detect a signature with the default parameters.
pub fn detect_signature(image: &DynamicImage) -> DetectionResult {
    SignatureDetector::default().detect(image)
}

/// Run both default detectors; a missing image yields no markers.
pub fn detect_markers(image: Option<&DynamicImage>) -> VisualMarkers {
    match image {
        Some(image) => VisualMarkers {
            stamp: detect_stamp(image),
            signature: detect_signature(image),
        },
        None => VisualMarkers::none(),
    }
}

/// Decode an image file and run both default detectors.
///
/// Decode failures are logged and reported as no markers.
pub fn detect_markers_from_path(path: &Path) -> VisualMarkers {
    match image::open(path) {
        Ok(image) => detect_markers(Some(&image)),
        Err(e) => {
            warn!("Could not decode {}: {}", path.display(), e);
            VisualMarkers::none()
        }
    }
}

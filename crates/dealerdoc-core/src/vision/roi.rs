//! Fractional regions of interest.

use serde::{Deserialize, Serialize};

use crate::models::record::Rectangle;

/// A sub-region expressed as fractions of the image height and width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl RegionOfInterest {
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Pixel bounds for an image of the given size, or `None` when the
    /// region is empty. Fractions are floored, so `x2`/`y2` are exclusive.
    pub fn pixel_bounds(&self, width: u32, height: u32) -> Option<Rectangle> {
        let scale = |fraction: f64, extent: u32| -> u32 {
            ((fraction.clamp(0.0, 1.0) * extent as f64) as u32).min(extent)
        };

        let x1 = scale(self.left, width);
        let x2 = scale(self.right, width);
        let y1 = scale(self.top, height);
        let y2 = scale(self.bottom, height);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(Rectangle { x1, y1, x2, y2 })
    }

    /// Whether all fractions lie in [0, 1] with top < bottom and left < right.
    pub fn is_valid(&self) -> bool {
        let unit = 0.0..=1.0;
        unit.contains(&self.top)
            && unit.contains(&self.bottom)
            && unit.contains(&self.left)
            && unit.contains(&self.right)
            && self.top < self.bottom
            && self.left < self.right
    }
}

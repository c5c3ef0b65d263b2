//! Binarization and external contour extraction.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::point::Point;

use crate::models::record::Rectangle;

/// Outer boundary of a foreground blob in ROI-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourRegion {
    /// Inclusive bounding rectangle: `x2 = x1 + width`, `y2 = y1 + height`.
    pub rect: Rectangle,

    /// Polygon area enclosed by the border points.
    pub area: f64,
}

impl ContourRegion {
    fn from_points(points: &[Point<u32>]) -> Option<Self> {
        let min_x = points.iter().map(|p| p.x).min()?;
        let max_x = points.iter().map(|p| p.x).max()?;
        let min_y = points.iter().map(|p| p.y).min()?;
        let max_y = points.iter().map(|p| p.y).max()?;

        Some(Self {
            rect: Rectangle::from_origin_size(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1),
            area: polygon_area(points),
        })
    }

    pub fn width(&self) -> u32 {
        self.rect.width()
    }

    pub fn height(&self) -> u32 {
        self.rect.height()
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width() as f64 / self.height() as f64
    }
}

/// Grayscale to binary with an Otsu threshold, dark ink becoming foreground (255).
///
/// An image without intensity spread has no foreground.
pub fn binarize_inverted(gray: &GrayImage) -> GrayImage {
    let (min, max) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    if min >= max {
        return GrayImage::new(gray.width(), gray.height());
    }

    let level = otsu_level(gray);
    threshold(gray, level, ThresholdType::BinaryInverted)
}

/// Top-level outer contours of a binary image.
///
/// Contours come in the border-following scan order: sorted by the first
/// border pixel met when scanning rows top to bottom, columns left to right.
pub fn external_contours(binary: &GrayImage) -> Vec<ContourRegion> {
    find_contours::<u32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| ContourRegion::from_points(&c.points))
        .collect()
}

/// Shoelace area of a closed polygon.
fn polygon_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64)
        .sum();

    twice_area.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;
    use pretty_assertions::assert_eq;

    fn white(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([255]))
    }

    #[test]
    fn test_binarize_marks_dark_ink() {
        let mut gray = white(20, 20);
        draw_filled_rect_mut(&mut gray, Rect::at(5, 5).of_size(4, 4), Luma([10]));

        let binary = binarize_inverted(&gray);
        assert_eq!(binary.get_pixel(6, 6)[0], 255);
        assert_eq!(binary.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_binarize_uniform_image_has_no_foreground() {
        for value in [0u8, 128, 255] {
            let gray = GrayImage::from_pixel(10, 10, Luma([value]));
            assert!(binarize_inverted(&gray).pixels().all(|p| p[0] == 0));
        }
    }

    #[test]
    fn test_square_area_and_rect() {
        let mut binary = GrayImage::new(100, 100);
        draw_filled_rect_mut(&mut binary, Rect::at(10, 20).of_size(30, 40), Luma([255]));

        let contours = external_contours(&binary);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].rect, Rectangle::new(10, 20, 40, 60));
        assert_eq!(contours[0].area, 29.0 * 39.0);
    }

    #[test]
    fn test_holes_and_nested_blobs_are_ignored() {
        let mut binary = GrayImage::new(100, 100);
        draw_filled_rect_mut(&mut binary, Rect::at(10, 10).of_size(60, 60), Luma([255]));
        draw_filled_rect_mut(&mut binary, Rect::at(20, 20).of_size(40, 40), Luma([0]));
        draw_filled_rect_mut(&mut binary, Rect::at(30, 30).of_size(10, 10), Luma([255]));

        let contours = external_contours(&binary);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].rect, Rectangle::new(10, 10, 70, 70));
    }

    #[test]
    fn test_scan_order_is_top_to_bottom() {
        let mut binary = GrayImage::new(100, 100);
        draw_filled_rect_mut(&mut binary, Rect::at(5, 60).of_size(10, 10), Luma([255]));
        draw_filled_rect_mut(&mut binary, Rect::at(70, 10).of_size(10, 10), Luma([255]));

        let contours = external_contours(&binary);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].rect.y1, 10);
        assert_eq!(contours[1].rect.y1, 60);
    }

    #[test]
    fn test_polygon_area_degenerate() {
        assert_eq!(polygon_area(&[Point::new(1, 1), Point::new(2, 2)]), 0.0);
    }
}

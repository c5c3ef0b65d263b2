//! Debug overlay of detected markers.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::debug;

use crate::error::Result;
use crate::models::record::{Rectangle, VisualMarkers};

const STAMP_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const SIGNATURE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LINE_WIDTH: u32 = 2;

fn draw_box(canvas: &mut RgbImage, rect: &Rectangle, color: Rgb<u8>) {
    for inset in 0..LINE_WIDTH {
        let w = rect.width().saturating_sub(2 * inset);
        let h = rect.height().saturating_sub(2 * inset);
        if w == 0 || h == 0 {
            break;
        }
        let r = Rect::at((rect.x1 + inset) as i32, (rect.y1 + inset) as i32).of_size(w, h);
        draw_hollow_rect_mut(canvas, r, color);
    }
}

/// Copy of `image` with a red box around the stamp and a green box around
/// the signature. Absent markers are not drawn.
pub fn annotate(image: &DynamicImage, markers: &VisualMarkers) -> RgbImage {
    let mut canvas = image.to_rgb8();
    if let Some(rect) = markers.stamp.bbox() {
        draw_box(&mut canvas, &rect, STAMP_COLOR);
    }
    if let Some(rect) = markers.signature.bbox() {
        draw_box(&mut canvas, &rect, SIGNATURE_COLOR);
    }
    canvas
}

/// Write the annotated copy to `out_path`; format follows the extension.
pub fn save_annotated(image: &DynamicImage, markers: &VisualMarkers, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    annotate(image, markers).save(out_path)?;
    debug!("Annotated image written to {}", out_path.display());
    Ok(())
}

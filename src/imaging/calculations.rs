//! Pure calculation functions for rendition dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{CropAxis, CropData};

/// Scale to an exact width, preserving aspect ratio.
pub fn scale_to_width(source: (u32, u32), width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let h = (width as f64 * src_h as f64 / src_w as f64).round() as u32;
    (width, h.max(1))
}

/// Scale to an exact height, preserving aspect ratio.
pub fn scale_to_height(source: (u32, u32), height: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let w = (height as f64 * src_w as f64 / src_h as f64).round() as u32;
    (w.max(1), height)
}

/// Largest size with the source aspect ratio that fits inside `bounds`.
///
/// # Examples
/// ```
/// # use responsive_sets::imaging::calculations::fit_within;
/// // 1600x1200 into a 400x400 box → 400x300
/// assert_eq!(fit_within((1600, 1200), (400, 400)), (400, 300));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    let src_aspect = src_w as f64 / src_h as f64;
    let box_aspect = max_w as f64 / max_h as f64;

    if src_aspect > box_aspect {
        scale_to_width(source, max_w)
    } else {
        scale_to_height(source, max_h)
    }
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = (h as f64 * src_aspect).round() as u32;
        (w, h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = (w as f64 / src_aspect).round() as u32;
        (w, h)
    }
}

/// Crop offset that keeps a focal point as central as possible.
///
/// The source is first scaled to cover `target` (see
/// [`calculate_fill_dimensions`]); the overflowing axis is then cropped so the
/// focus sits at the middle of the target box, clamped to the image edges.
///
/// `focus` uses the focal-point convention: both coordinates in `-1.0..=1.0`,
/// `(0, 0)` is the centre, `x = -1` the left edge and `y = 1` the top edge.
pub fn calculate_focal_crop(source: (u32, u32), target: (u32, u32), focus: (f64, f64)) -> CropData {
    let (tgt_w, tgt_h) = target;
    let (fill_w, fill_h) = calculate_fill_dimensions(source, target);
    let (focus_x, focus_y) = (focus.0.clamp(-1.0, 1.0), focus.1.clamp(-1.0, 1.0));

    if fill_w > tgt_w {
        let centre = (focus_x + 1.0) / 2.0 * fill_w as f64;
        CropData {
            axis: CropAxis::X,
            offset: crop_offset(centre, tgt_w, fill_w - tgt_w),
        }
    } else {
        let centre = (1.0 - focus_y) / 2.0 * fill_h as f64;
        CropData {
            axis: CropAxis::Y,
            offset: crop_offset(centre, tgt_h, fill_h.saturating_sub(tgt_h)),
        }
    }
}

fn crop_offset(centre: f64, window: u32, excess: u32) -> u32 {
    let start = (centre - window as f64 / 2.0).round();
    start.clamp(0.0, excess as f64) as u32
}

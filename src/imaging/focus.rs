//! Focal-point crop collaborator.
//!
//! A [`FocusPoint`] knows the source dimensions and where the subject sits,
//! and answers [`FocalCrop::calculate_crop`] for any target box. The builder
//! only consults it for focal-crop methods, and only when one was injected.

use super::backend::{FocalCrop, FormatError};
use super::calculations::calculate_focal_crop;
use super::params::{CROPPED_FOCUSED_IMAGE, CropData};

/// Focus coordinates for one source image.
///
/// `x` and `y` are in `-1.0..=1.0` with `(0, 0)` at the centre and `y = 1`
/// at the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusPoint {
    pub x: f64,
    pub y: f64,
    pub source: (u32, u32),
}

impl FocusPoint {
    pub fn new(x: f64, y: f64, source: (u32, u32)) -> Self {
        Self { x, y, source }
    }

    /// Parse `"x,y"` as given on the command line.
    pub fn parse(raw: &str, source: (u32, u32)) -> Option<Self> {
        let (x, y) = raw.split_once(',')?;
        let x: f64 = x.trim().parse().ok()?;
        let y: f64 = y.trim().parse().ok()?;
        (x.is_finite() && y.is_finite()).then(|| Self::new(x, y, source))
    }
}

impl FocalCrop for FocusPoint {
    fn calculate_crop(&self, width: u32, height: u32) -> Result<CropData, FormatError> {
        if width == 0 || height == 0 {
            return Err(FormatError::invalid(
                CROPPED_FOCUSED_IMAGE,
                format!("crop box {width}x{height} must be non-zero"),
            ));
        }
        if self.source.0 == 0 || self.source.1 == 0 {
            return Err(FormatError::invalid(
                CROPPED_FOCUSED_IMAGE,
                "source image has no dimensions",
            ));
        }
        let focus = (self.x, self.y);
        Ok(calculate_focal_crop(self.source, (width, height), focus))
    }
}

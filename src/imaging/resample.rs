//! Stock image formatter: plans renditions without touching pixels.
//!
//! Each supported method maps a source image and its arguments to output
//! dimensions and a deterministic URL under `_resampled/`, the way a CMS asset
//! store names derived files. Whatever serves those URLs does the actual
//! resampling.
//!
//! ## Method table
//!
//! | Method | Arguments | Output size |
//! |---|---|---|
//! | `SetWidth` | `w` | `w` × proportional |
//! | `SetHeight` | `h` | proportional × `h` |
//! | `SetSize` | `w, h` | `w` × `h` (padded) |
//! | `PaddedImage` | `w, h [, color]` | `w` × `h` |
//! | `SetRatioSize` | `w, h` | fits inside `w` × `h` |
//! | `CroppedImage` | `w, h` | `w` × `h` (centre crop) |
//! | `CroppedFocusedImage` | `w, h [, axis, offset]` | `w` × `h` |

use super::backend::{FormatError, ImageFormatter, ImageHandle};
use super::calculations::{fit_within, scale_to_height, scale_to_width};
use super::params::{
    Arg, CROPPED_FOCUSED_IMAGE, CROPPED_IMAGE, CropAxis, FormatCall, PADDED_IMAGE, SET_HEIGHT,
    SET_RATIO_SIZE, SET_SIZE, SET_WIDTH,
};
use sha2::{Digest, Sha256};

/// Every method the stock backend knows, in canonical spelling.
pub const SUPPORTED_METHODS: &[&str] = &[
    SET_WIDTH,
    SET_HEIGHT,
    SET_SIZE,
    PADDED_IMAGE,
    SET_RATIO_SIZE,
    CROPPED_IMAGE,
    CROPPED_FOCUSED_IMAGE,
];

/// Directory segment derived files are placed under.
const RESAMPLED_DIR: &str = "_resampled";

/// The source image a backend formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Asset path as it appears in URLs, e.g. `assets/photos/hero.jpg`.
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl SourceImage {
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Dimension-planning backend bound to one [`SourceImage`].
#[derive(Debug, Clone)]
pub struct ResampleBackend {
    image: SourceImage,
}

impl ResampleBackend {
    pub fn new(image: SourceImage) -> Self {
        Self { image }
    }

    fn output_size(&self, method: &str, args: &[Arg]) -> Result<(u32, u32), FormatError> {
        let source = self.image.dimensions();
        match method {
            SET_WIDTH => Ok(scale_to_width(source, positive(method, args, 0)?)),
            SET_HEIGHT => Ok(scale_to_height(source, positive(method, args, 0)?)),
            SET_RATIO_SIZE => Ok(fit_within(source, box_args(method, args)?)),
            SET_SIZE | PADDED_IMAGE | CROPPED_IMAGE => box_args(method, args),
            CROPPED_FOCUSED_IMAGE => {
                let size = box_args(method, args)?;
                check_crop_args(method, &args[2..])?;
                Ok(size)
            }
            other => Err(FormatError::UnknownMethod(other.to_string())),
        }
    }
}

impl ImageFormatter for ResampleBackend {
    fn has_method(&self, name: &str) -> bool {
        canonical_method(name).is_some()
    }

    fn format(&self, call: &FormatCall) -> Result<ImageHandle, FormatError> {
        let method = canonical_method(&call.method)
            .ok_or_else(|| FormatError::UnknownMethod(call.method.clone()))?;
        if self.image.width == 0 || self.image.height == 0 {
            return Err(FormatError::invalid(
                method,
                "source image has no dimensions",
            ));
        }
        let (width, height) = self.output_size(method, &call.args)?;
        Ok(ImageHandle {
            url: resampled_url(&self.image.path, method, &call.args),
            width,
            height,
        })
    }
}

/// Canonical spelling of a supported method, matched case-insensitively.
pub fn canonical_method(name: &str) -> Option<&'static str> {
    SUPPORTED_METHODS
        .iter()
        .copied()
        .find(|m| m.eq_ignore_ascii_case(name))
}

/// Argument `index` as a strictly positive pixel count.
fn positive(method: &str, args: &[Arg], index: usize) -> Result<u32, FormatError> {
    let Some(arg) = args.get(index) else {
        let message = format!("missing argument {}", index + 1);
        return Err(FormatError::invalid(method, message));
    };
    arg.as_int()
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            FormatError::invalid(method, format!("'{arg}' is not a positive pixel size"))
        })
}

fn box_args(method: &str, args: &[Arg]) -> Result<(u32, u32), FormatError> {
    Ok((positive(method, args, 0)?, positive(method, args, 1)?))
}

/// Trailing `axis, offset` pair of a focal crop, when present.
fn check_crop_args(method: &str, rest: &[Arg]) -> Result<(), FormatError> {
    match rest {
        [] => Ok(()),
        [axis, offset] => {
            let axis_ok = axis.as_text().and_then(CropAxis::parse).is_some();
            let offset_ok = offset.as_int().is_some_and(|n| n >= 0);
            if axis_ok && offset_ok {
                Ok(())
            } else {
                Err(FormatError::invalid(
                    method,
                    format!("bad crop data '{axis}, {offset}'"),
                ))
            }
        }
        _ => Err(FormatError::invalid(
            method,
            "expected crop axis and offset after the size",
        )),
    }
}

/// Short SHA-256 of a call, stable across runs.
pub fn hash_call(method: &str, args: &[Arg]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\0");
    for arg in args {
        hasher.update(arg.to_string().as_bytes());
        hasher.update(b"\0");
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..10].to_string()
}

/// `dir/_resampled/<Method>-<hash>-<file>` for a source path.
pub fn resampled_url(source_path: &str, method: &str, args: &[Arg]) -> String {
    let hash = hash_call(method, args);
    match source_path.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/{RESAMPLED_DIR}/{method}-{hash}-{file}"),
        None => format!("{RESAMPLED_DIR}/{method}-{hash}-{source_path}"),
    }
}

//! Parameter types for image-formatting calls.
//!
//! These types describe *what* rendition to produce, not *how*. They are the
//! interface between the set [`builder`](crate::builder) (which decides which
//! calls to make) and an [`ImageFormatter`](super::ImageFormatter) (which
//! produces the handle). Keeping them plain data lets tests swap in a
//! recording formatter without changing any build logic.
//!
//! ## Types
//!
//! - [`Arg`]: one configured argument: an integer or a string.
//! - [`FormatCall`]: a method name plus its argument list.
//! - [`CropAxis`] / [`CropData`]: focal-point crop result appended to calls.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const SET_WIDTH: &str = "SetWidth";
pub const SET_HEIGHT: &str = "SetHeight";
pub const SET_SIZE: &str = "SetSize";
pub const SET_RATIO_SIZE: &str = "SetRatioSize";
pub const PADDED_IMAGE: &str = "PaddedImage";
pub const CROPPED_IMAGE: &str = "CroppedImage";
pub const CROPPED_FOCUSED_IMAGE: &str = "CroppedFocusedImage";

/// Whether `method` asks for a crop centred on the image's focal point.
pub fn is_focal_crop_method(method: &str) -> bool {
    method.eq_ignore_ascii_case(CROPPED_FOCUSED_IMAGE)
}

/// A single configured argument.
///
/// Configuration lists mix both kinds, e.g. `["CroppedImage", 200, 400]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Int(i64),
    Text(String),
}

impl Arg {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(n) => Some(*n),
            Arg::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Arg::Int(_) => None,
            Arg::Text(s) => Some(s),
        }
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Int(n)
    }
}

impl From<u32> for Arg {
    fn from(n: u32) -> Self {
        Arg::Int(i64::from(n))
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(n) => write!(f, "{n}"),
            Arg::Text(s) => f.write_str(s),
        }
    }
}

/// Parse a CLI-style argument: integers stay integers, everything else is text.
pub fn parse_arg(raw: &str) -> Arg {
    raw.parse::<i64>()
        .map(Arg::Int)
        .unwrap_or_else(|_| Arg::Text(raw.to_string()))
}

/// One call into an image formatter: `method(args...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCall {
    pub method: String,
    pub args: Vec<Arg>,
}

impl FormatCall {
    pub fn new(method: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

impl fmt::Display for FormatCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(Arg::to_string).collect();
        write!(f, "{}({})", self.method, args.join(","))
    }
}

/// Axis along which a focal-point crop discards pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CropAxis {
    X,
    Y,
}

impl CropAxis {
    pub fn as_str(self) -> &'static str {
        match self {
            CropAxis::X => "x",
            CropAxis::Y => "y",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "x" | "X" => Some(CropAxis::X),
            "y" | "Y" => Some(CropAxis::Y),
            _ => None,
        }
    }
}

/// Result of a focal-point crop calculation.
///
/// `offset` is measured in pixels of the image after it has been scaled to
/// cover the target box, along `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropData {
    pub axis: CropAxis,
    pub offset: u32,
}

impl CropData {
    /// The two trailing arguments a focal-crop call expects.
    pub fn to_args(self) -> [Arg; 2] {
        [
            Arg::Text(self.axis.as_str().to_string()),
            Arg::from(self.offset),
        ]
    }
}

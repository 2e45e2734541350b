//! Image-formatting capability contract and shared types.
//!
//! The [`ImageFormatter`] trait is the only way the set builder produces
//! renditions: it asks whether a method exists and asks for a handle. The
//! optional [`FocalCrop`] collaborator computes crop offsets for focal-point
//! methods.
//!
//! The stock implementation is
//! [`ResampleBackend`](super::resample::ResampleBackend), which plans
//! renditions (dimensions and URL) without doing pixel work.

use super::params::{CropData, FormatCall};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unknown image method '{0}'")]
    UnknownMethod(String),
    #[error("invalid arguments for {method}: {reason}")]
    InvalidArguments { method: String, reason: String },
}

impl FormatError {
    pub fn invalid(method: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

/// A generated rendition, as handed to templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageHandle {
    #[serde(rename = "URL")]
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// The host's image-formatting capability.
///
/// Implementations are bound to one source image and are expected to be
/// synchronous; errors are returned to the caller untouched.
pub trait ImageFormatter: Sync {
    /// Whether `name` is a method this formatter can execute.
    fn has_method(&self, name: &str) -> bool;

    /// Produce one rendition.
    fn format(&self, call: &FormatCall) -> Result<ImageHandle, FormatError>;
}

/// Optional focal-point crop capability.
pub trait FocalCrop: Sync {
    /// Compute the crop axis and offset for a `width` × `height` target box.
    fn calculate_crop(&self, width: u32, height: u32) -> Result<CropData, FormatError>;
}

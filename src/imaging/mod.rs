//! Image-formatting capability: the contract the set builder calls, plus the
//! stock pieces that satisfy it.
//!
//! | Piece | Role |
//! |---|---|
//! | [`ImageFormatter`] | `has_method` + `format(call) -> ImageHandle` |
//! | [`FocalCrop`] | optional crop-offset collaborator |
//! | [`ResampleBackend`] | stock formatter, dimension planning only |
//! | [`FocusPoint`] | stock focal-point crop |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Arguments and calls passed to formatters
//! - **Backend**: the collaborator traits and handle type
//! - **Resample / Focus**: the stock implementations

pub mod backend;
pub mod calculations;
pub mod focus;
pub mod params;
pub mod resample;

pub use backend::{FocalCrop, FormatError, ImageFormatter, ImageHandle};
pub use focus::FocusPoint;
pub use params::{Arg, CropAxis, CropData, FormatCall};
pub use resample::{ResampleBackend, SourceImage};

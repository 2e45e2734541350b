//! # Responsive Sets
//!
//! Named responsive image sets for templates. A site declares sets once in
//! TOML (a resize method, an ordered list of media-query breakpoints, and the
//! arguments for each), and templates ask for a set by name on any image:
//!
//! ```text
//! image.ArticleHero          → <picture> with one <source> per breakpoint
//! image.ArticleHero(400,200) → same, default <img> rendition overridden
//! ```
//!
//! # Architecture
//!
//! ```text
//! config      responsive-sets.toml  →  ResponsiveConfig   (layered over stock defaults)
//! resolver    set name              →  SetConfig          (case-insensitive)
//! builder     SetConfig + formatter →  RenderPayload      (one call per breakpoint)
//! render      RenderPayload         →  Markup             (ResponsiveImageSet template)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `responsive-sets.toml` loading, layering, validation, stock config |
//! | [`resolver`] | Case-insensitive set name lookup |
//! | [`builder`] | Builds renditions for a set, plus the build error taxonomy |
//! | [`dispatch`] | Registry of callable set names bound to an image |
//! | [`imaging`] | Formatter and focal-crop contracts, stock backend, dimension math |
//! | [`render`] | Maud templates and the preview page |
//! | [`requirements`] | Declare-once client script collector |
//! | [`types`] | `Rendition` and `RenderPayload` |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup for the CLI |
//!
//! # Design Decisions
//!
//! ## Explicit Registry Over Method Interception
//!
//! Set names are registered up front in a [`dispatch::SetRegistry`]. A call
//! for a name that isn't a set returns `None` and the host handles it as it
//! would any unknown method. Nothing is intercepted.
//!
//! ## Fail Before Formatting
//!
//! Every breakpoint of a set is validated before the formatter is called for
//! any of them, so a misconfigured set never leaves half its renditions
//! generated. Validation errors are fatal to the render; they are
//! configuration bugs, not content problems.
//!
//! ## Configured Order Is Output Order
//!
//! Browsers take the first matching `<source>`, so breakpoint order matters.
//! TOML is parsed with `preserve_order` and sets are stored in
//! [`indexmap::IndexMap`]s; layering overrides keys in place.
//!
//! ## Planning, Not Pixels
//!
//! The stock [`imaging::ResampleBackend`] computes rendition dimensions and
//! deterministic `_resampled/` URLs. Producing the files is left to whatever
//! serves those URLs; any other [`imaging::ImageFormatter`] can be plugged in.

pub mod builder;
pub mod config;
pub mod dispatch;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod render;
pub mod requirements;
pub mod resolver;
pub mod types;

pub use builder::{BuildError, SetBuilder};
pub use config::{ResponsiveConfig, SetConfig};
pub use dispatch::{ResponsiveImage, SetRegistry};
pub use render::{MaudTemplates, TemplateRenderer};
pub use requirements::Requirements;
pub use types::{RenderPayload, Rendition};

#[cfg(test)]
pub(crate) mod test_helpers;

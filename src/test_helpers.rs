//! Shared test utilities for the responsive-sets test suite.
//!
//! Provides a sample configuration, lookup helpers that panic with the
//! available names on a miss, and payload extractors.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let registry = sample_registry();
//! let set = find_set(&registry, "ArticleHero");
//! assert_eq!(set.config.method.as_deref(), Some("CroppedImage"));
//!
//! assert_queries(&payload, &["(min-width: 1200px)", "(min-width: 800px)"]);
//! ```

use crate::config::parse_config;
use crate::dispatch::SetRegistry;
use crate::resolver::NamedSet;
use crate::types::RenderPayload;

// =========================================================================
// Fixture setup
// =========================================================================

/// Three sets covering the common shapes: a cropped set with its own
/// default, a focal-crop set inheriting the global default, and a set whose
/// default rendition names its own method.
pub const SAMPLE_SETS: &str = r#"
[sets.ArticleHero]
method = "CroppedImage"
default_arguments = [1200, 600]

[sets.ArticleHero.arguments]
"(min-width: 1200px)" = [1600, 800]
"(min-width: 800px)" = [1200, 600]
"(min-width: 200px)" = [400, 200]

[sets.Avatar]
method = "CroppedFocusedImage"
arguments = { "(min-width: 400px)" = [96, 96] }

[sets.Gallery]
default_arguments = ["SetHeight", 300]
arguments = { "(min-width: 600px)" = [600], "(max-width: 599px)" = [300] }
"#;

/// Registry over [`SAMPLE_SETS`].
pub fn sample_registry() -> SetRegistry {
    SetRegistry::new(parse_config(SAMPLE_SETS).unwrap())
}

// =========================================================================
// Lookups: panics with a clear message on miss
// =========================================================================

/// Find a set by name (case-insensitive). Panics if not found.
pub fn find_set<'a>(registry: &'a SetRegistry, name: &str) -> &'a NamedSet {
    registry.handler(name).unwrap_or_else(|| {
        let names = registry.method_names();
        panic!("set '{name}' not found. Available: {names:?}")
    })
}

// =========================================================================
// Payload extractors
// =========================================================================

/// Media queries of a payload in rendition order.
pub fn queries(payload: &RenderPayload) -> Vec<&str> {
    payload.sizes.iter().map(|r| r.query.as_str()).collect()
}

/// Rendition URLs of a payload in order, default rendition last.
pub fn urls(payload: &RenderPayload) -> Vec<&str> {
    payload
        .sizes
        .iter()
        .map(|r| r.image.url.as_str())
        .chain(std::iter::once(payload.default_image.url.as_str()))
        .collect()
}

/// Assert the payload's media queries match `expected`, in order.
pub fn assert_queries(payload: &RenderPayload, expected: &[&str]) {
    assert_eq!(
        queries(payload),
        expected,
        "media queries of set '{}' mismatch",
        payload.set_name
    );
}

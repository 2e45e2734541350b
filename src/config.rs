//! Responsive set configuration.
//!
//! Handles loading, layering, and validating the TOML files that declare
//! responsive image sets. Stock defaults are overridden by any number of
//! user files, applied in order, each one merged table by table on top of
//! the previous result.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All global options are optional - defaults shown below
//!
//! default_method = "SetWidth"          # Method for sets that don't name one
//! default_arguments = [800, 600]       # Default rendition when a set has none
//! script = "javascript/picturefill.min.js"  # Polyfill required once per page
//! template = "ResponsiveImageSet"      # Template the payload is rendered with
//!
//! [sets.ArticleHero]
//! method = "CroppedImage"
//! default_arguments = [1200, 600]
//!
//! [sets.ArticleHero.arguments]
//! "(min-width: 1200px)" = [1600, 800]
//! "(min-width: 800px)" = [1200, 600]
//! "(min-width: 200px)" = [400, 200]
//! ```
//!
//! Breakpoints keep their declaration order: browsers pick the first
//! `<source>` whose media query matches, so order is precedence.
//!
//! ## Layering
//!
//! A later file can add sets, replace a set's method, or override a single
//! breakpoint without repeating the rest. Overriding a breakpoint keeps its
//! original position.
//!
//! ## Validation
//!
//! Global keys are validated at load time and unknown keys are rejected to
//! catch typos early. The *shape* of each set (breakpoint keys and argument
//! lists) is deliberately not checked here: a malformed set fails when it is
//! built, see [`crate::builder`].

use crate::imaging::Arg;
use crate::render::RESPONSIVE_IMAGE_SET;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Process-wide responsive image configuration.
///
/// Built once at startup and shared by reference; nothing mutates it after
/// [`load_config`] returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResponsiveConfig {
    /// Formatting method used by sets that don't name one.
    pub default_method: String,
    /// Arguments for the default rendition when neither the caller nor the
    /// set supplies any.
    pub default_arguments: Vec<Arg>,
    /// Client-side polyfill script registered whenever a set is rendered.
    pub script: String,
    /// Name of the template the render payload is handed to.
    pub template: String,
    /// Configured sets, keyed by name as written in the file.
    pub sets: IndexMap<String, SetConfig>,
}

pub const DEFAULT_METHOD: &str = "SetWidth";
pub const DEFAULT_SCRIPT: &str = "javascript/picturefill.min.js";

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            default_method: DEFAULT_METHOD.to_string(),
            default_arguments: vec![Arg::Int(800), Arg::Int(600)],
            script: DEFAULT_SCRIPT.to_string(),
            template: RESPONSIVE_IMAGE_SET.to_string(),
            sets: IndexMap::new(),
        }
    }
}

impl ResponsiveConfig {
    /// Validate the global keys.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_method.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_method must not be empty".into(),
            ));
        }
        if self.default_arguments.is_empty() {
            return Err(ConfigError::Validation(
                "default_arguments must not be empty".into(),
            ));
        }
        if self.script.trim().is_empty() {
            return Err(ConfigError::Validation("script must not be empty".into()));
        }
        if self.template.trim().is_empty() {
            return Err(ConfigError::Validation("template must not be empty".into()));
        }
        Ok(())
    }
}

/// One named responsive set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetConfig {
    /// Formatting method for every rendition of this set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Media query → argument list, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Breakpoints>,
    /// Arguments for the unconditional rendition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_arguments: Option<Vec<Arg>>,
}

/// The `arguments` of a set as written in configuration.
///
/// A table is the intended form. A plain array is accepted so that the
/// builder can reject it with a precise error: its entries have positional
/// (numeric) keys, which are not media queries. Any other value loads as
/// `Malformed` and has no breakpoints, so one broken set never keeps the
/// rest of the file from loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Breakpoints {
    Queries(IndexMap<String, BreakpointArgs>),
    Positional(Vec<BreakpointArgs>),
    Malformed(toml::Value),
}

impl Breakpoints {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        match self {
            Breakpoints::Queries(map) => map.len(),
            Breakpoints::Positional(list) => list.len(),
            Breakpoints::Malformed(_) => 0,
        }
    }

    /// `(key, args)` pairs in declaration order; positional entries are keyed
    /// by their index.
    pub fn entries(&self) -> Vec<(Cow<'_, str>, &BreakpointArgs)> {
        match self {
            Breakpoints::Queries(map) => map
                .iter()
                .map(|(query, args)| (Cow::Borrowed(query.as_str()), args))
                .collect(),
            Breakpoints::Positional(list) => list
                .iter()
                .enumerate()
                .map(|(i, args)| (Cow::Owned(i.to_string()), args))
                .collect(),
            Breakpoints::Malformed(_) => Vec::new(),
        }
    }
}

/// Arguments of one breakpoint: a list of integers and strings, or anything
/// else (a scalar, a table, a list holding floats or booleans), which is
/// rejected at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BreakpointArgs {
    List(Vec<Arg>),
    Scalar(Arg),
    Malformed(toml::Value),
}

impl BreakpointArgs {
    /// The argument list, if this is a non-empty list.
    pub fn as_non_empty_list(&self) -> Option<&[Arg]> {
        match self {
            BreakpointArgs::List(args) if !args.is_empty() => Some(args),
            _ => None,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    let mut table = toml::Table::new();
    let defaults = ResponsiveConfig::default();
    table.insert(
        "default_method".into(),
        toml::Value::String(defaults.default_method),
    );
    table.insert(
        "default_arguments".into(),
        toml::Value::Array(defaults.default_arguments.iter().map(arg_to_toml).collect()),
    );
    table.insert("script".into(), toml::Value::String(defaults.script));
    table.insert("template".into(), toml::Value::String(defaults.template));
    table.insert("sets".into(), toml::Value::Table(toml::Table::new()));
    toml::Value::Table(table)
}

fn arg_to_toml(arg: &Arg) -> toml::Value {
    match arg {
        Arg::Int(n) => toml::Value::Integer(*n),
        Arg::Text(s) => toml::Value::String(s.clone()),
    }
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys in place).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
/// - New keys from overlay are appended after the existing ones.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(slot) => {
                        let base_val = std::mem::replace(slot, toml::Value::Boolean(false));
                        *slot = merge_toml(base_val, overlay_val);
                    }
                    None => {
                        base_table.insert(key, overlay_val);
                    }
                }
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load one config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, skipping");
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<ResponsiveConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: ResponsiveConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load and layer config files on top of the stock defaults.
///
/// Missing files are skipped, so with no files at all the result is the
/// stock configuration with no sets.
pub fn load_config<P: AsRef<Path>>(paths: &[P]) -> Result<ResponsiveConfig, ConfigError> {
    let mut overlays = Vec::new();
    for path in paths {
        if let Some(value) = load_raw_config(path.as_ref())? {
            overlays.push(value);
        }
    }
    let layers = overlays.len();
    let config = resolve_config(stock_defaults_value(), overlays)?;
    let sets = config.sets.len();
    tracing::info!(layers, sets, "loaded responsive set config");
    Ok(config)
}

/// Parse a single TOML document on top of the stock defaults.
pub fn parse_config(content: &str) -> Result<ResponsiveConfig, ConfigError> {
    let value: toml::Value = toml::from_str(content)?;
    resolve_config(stock_defaults_value(), [value])
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Responsive Sets Configuration
# =============================
# All global settings are optional. Values shown below are the defaults.
#
# Several files can be layered with repeated --config flags; later files
# override earlier ones key by key. Unknown keys cause an error.

# Formatting method for sets that don't name one.
default_method = "SetWidth"

# Arguments for the default (unconditional) rendition when neither the
# template call nor the set supplies any.
default_arguments = [800, 600]

# Polyfill script required once per page that renders a set.
script = "javascript/picturefill.min.js"

# Template the render payload is handed to.
template = "ResponsiveImageSet"

# ---------------------------------------------------------------------------
# Sets
# ---------------------------------------------------------------------------
# Each set maps CSS media queries to the arguments of one rendition.
# Order matters: the first matching query wins in the browser.
# Set names are matched case-insensitively.
#
# Available methods: SetWidth, SetHeight, SetSize, SetRatioSize,
# PaddedImage, CroppedImage, CroppedFocusedImage.
#
# [sets.ArticleHero]
# method = "CroppedImage"
# default_arguments = [1200, 600]
#
# [sets.ArticleHero.arguments]
# "(min-width: 1200px)" = [1600, 800]
# "(min-width: 800px)" = [1200, 600]
# "(min-width: 200px)" = [400, 200]
[sets]
"##
}

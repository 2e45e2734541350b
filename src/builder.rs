//! Builds the render payload for one responsive set.
//!
//! The builder validates a set's breakpoints, resolves its method and default
//! arguments, asks the [`ImageFormatter`] for one rendition per breakpoint
//! plus a default rendition, and records the polyfill script the markup needs.
//!
//! ## Validation
//!
//! Every breakpoint is checked before the first formatter call, so a broken
//! set never yields a partial payload:
//!
//! | Problem | Error |
//! |---|---|
//! | `arguments` missing, empty or not a table | [`BuildError::MissingArguments`] |
//! | key empty or numeric | [`BuildError::InvalidMediaQuery`] |
//! | argument list empty or not a list of sizes | [`BuildError::MissingBreakpointArguments`] |
//!
//! ## Default rendition
//!
//! Its arguments come from, in order: the caller's non-empty override, the
//! set's `default_arguments`, the global `default_arguments`. If the first of
//! those arguments is a string naming a method the formatter knows, that
//! method is called with the remaining arguments; otherwise the set's method
//! is called with all of them.

use crate::config::{ResponsiveConfig, SetConfig};
use crate::imaging::params::is_focal_crop_method;
use crate::imaging::{Arg, FocalCrop, FormatCall, FormatError, ImageFormatter, ImageHandle};
use crate::requirements::Requirements;
use crate::types::{RenderPayload, Rendition};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("responsive set '{set}' has no breakpoint arguments")]
    MissingArguments { set: String },
    #[error("responsive set '{set}': '{query}' is not a media query")]
    InvalidMediaQuery { set: String, query: String },
    #[error("responsive set '{set}': breakpoint '{query}' needs a non-empty argument list")]
    MissingBreakpointArguments { set: String, query: String },
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Builds payloads against one formatter, with optional focal cropping.
pub struct SetBuilder<'a> {
    defaults: &'a ResponsiveConfig,
    formatter: &'a dyn ImageFormatter,
    focal_crop: Option<&'a dyn FocalCrop>,
}

impl<'a> SetBuilder<'a> {
    pub fn new(defaults: &'a ResponsiveConfig, formatter: &'a dyn ImageFormatter) -> Self {
        Self {
            defaults,
            formatter,
            focal_crop: None,
        }
    }

    /// Attach a focal-point crop collaborator.
    pub fn with_focal_crop(mut self, focal_crop: Option<&'a dyn FocalCrop>) -> Self {
        self.focal_crop = focal_crop;
        self
    }

    /// Build the payload for `config`, declared as `set_name`.
    ///
    /// `override_default_args` replaces the default rendition's arguments when
    /// non-empty; breakpoint renditions are unaffected by it. The polyfill
    /// script is declared on `requirements` once the payload is complete.
    pub fn create_responsive_set(
        &self,
        config: &SetConfig,
        override_default_args: &[Arg],
        set_name: &str,
        requirements: &mut Requirements,
    ) -> Result<RenderPayload, BuildError> {
        let breakpoints = validate_breakpoints(config, set_name)?;
        let method = self.resolve_method(config);

        let mut sizes = Vec::with_capacity(breakpoints.len());
        for (query, args) in breakpoints {
            let image = self.format(method, args.to_vec())?;
            tracing::debug!(set = set_name, query = %query, url = %image.url, "rendition");
            sizes.push(Rendition { query, image });
        }

        let default_args = self.resolve_default_args(config, override_default_args);
        let (default_method, default_args) = self.split_default_call(method, default_args);
        let default_image = self.format(&default_method, default_args)?;
        tracing::debug!(set = set_name, url = %default_image.url, "default rendition");

        if requirements.javascript(&self.defaults.script) {
            tracing::debug!(script = %self.defaults.script, "required polyfill");
        }

        Ok(RenderPayload {
            set_name: set_name.to_string(),
            sizes,
            default_image,
            title: None,
        })
    }

    /// The set's own method, or the global default.
    pub fn resolve_method<'c>(&'c self, config: &'c SetConfig) -> &'c str {
        config
            .method
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(&self.defaults.default_method)
    }

    /// Caller override, then set default, then global default.
    pub fn resolve_default_args(&self, config: &SetConfig, override_args: &[Arg]) -> Vec<Arg> {
        if !override_args.is_empty() {
            return override_args.to_vec();
        }
        config
            .default_arguments
            .clone()
            .unwrap_or_else(|| self.defaults.default_arguments.clone())
    }

    /// Use a leading method name from the arguments, or fall back to `method`.
    fn split_default_call(&self, method: &str, mut args: Vec<Arg>) -> (String, Vec<Arg>) {
        match args.first() {
            Some(Arg::Text(name)) if self.formatter.has_method(name) => {
                let name = name.clone();
                args.remove(0);
                (name, args)
            }
            _ => (method.to_string(), args),
        }
    }

    fn format(&self, method: &str, args: Vec<Arg>) -> Result<ImageHandle, BuildError> {
        let args = self.with_crop_data(method, args)?;
        let call = FormatCall::new(method, args);
        Ok(self.formatter.format(&call)?)
    }

    /// Append focal crop axis and offset for focal-crop methods.
    fn with_crop_data(&self, method: &str, mut args: Vec<Arg>) -> Result<Vec<Arg>, BuildError> {
        let Some(focal_crop) = self.focal_crop else {
            return Ok(args);
        };
        if !is_focal_crop_method(method) {
            return Ok(args);
        }
        let size = |i: usize| {
            args.get(i)
                .and_then(Arg::as_int)
                .and_then(|n| u32::try_from(n).ok())
        };
        let (Some(width), Some(height)) = (size(0), size(1)) else {
            return Err(
                FormatError::invalid(method, "focal crop needs a width and a height").into(),
            );
        };
        let crop = focal_crop.calculate_crop(width, height)?;
        args.extend(crop.to_args());
        Ok(args)
    }
}

/// Check every breakpoint of a set, returning `(query, args)` in order.
pub fn validate_breakpoints<'c>(
    config: &'c SetConfig,
    set_name: &str,
) -> Result<Vec<(String, &'c [Arg])>, BuildError> {
    let breakpoints = match &config.arguments {
        Some(breakpoints) if !breakpoints.is_empty() => breakpoints,
        _ => {
            return Err(BuildError::MissingArguments {
                set: set_name.to_string(),
            });
        }
    };

    let mut validated = Vec::with_capacity(breakpoints.len());
    for (query, args) in breakpoints.entries() {
        if !is_media_query(&query) {
            return Err(BuildError::InvalidMediaQuery {
                set: set_name.to_string(),
                query: query.into_owned(),
            });
        }
        let Some(args) = args.as_non_empty_list() else {
            return Err(BuildError::MissingBreakpointArguments {
                set: set_name.to_string(),
                query: query.into_owned(),
            });
        };
        validated.push((query.into_owned(), args));
    }
    Ok(validated)
}

/// A breakpoint key must be non-blank text that isn't a number.
pub fn is_media_query(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !is_numeric(key)
}

/// Decimal number syntax: optional sign, digits with an optional fraction,
/// optional exponent.
fn is_numeric(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());

    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mantissa_ok = !(int.is_empty() && frac.is_empty()) && all_digits(int) && all_digits(frac);
    let exponent_ok = exponent.is_none_or(|e| {
        let e = e.strip_prefix(['+', '-']).unwrap_or(e);
        !e.is_empty() && all_digits(e)
    });
    mantissa_ok && exponent_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::imaging::backend::tests::{FixedCrop, MockFormatter};

    fn set(config: &ResponsiveConfig, name: &str) -> SetConfig {
        config.sets[name].clone()
    }

    fn build(
        toml: &str,
        name: &str,
        override_args: &[Arg],
    ) -> (Result<RenderPayload, BuildError>, MockFormatter) {
        let config = parse_config(toml).unwrap();
        let formatter = MockFormatter::new();
        let mut req = Requirements::new();
        let result = SetBuilder::new(&config, &formatter).create_responsive_set(
            &set(&config, name),
            override_args,
            name,
            &mut req,
        );
        (result, formatter)
    }

    const EXAMPLE: &str = r#"
[sets.Example]
method = "CroppedImage"
default_arguments = [200, 400]

[sets.Example.arguments]
"(min-width: 200px)" = [200, 100]
"(min-width: 800px)" = [200, 400]
"#;

    // =========================================================================
    // Payload assembly
    // =========================================================================

    #[test]
    fn builds_ordered_renditions_and_default() {
        let (result, formatter) = build(EXAMPLE, "Example", &[]);
        let payload = result.unwrap();

        let queries: Vec<&str> = payload.sizes.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["(min-width: 200px)", "(min-width: 800px)"]);
        assert_eq!(payload.sizes[0].image.url, "/mock/CroppedImage/200x100");
        assert_eq!(payload.sizes[1].image.url, "/mock/CroppedImage/200x400");
        assert_eq!(payload.default_image.url, "/mock/CroppedImage/200x400");
        assert_eq!(payload.set_name, "Example");

        assert_eq!(
            formatter.call_strings(),
            vec![
                "CroppedImage(200,100)",
                "CroppedImage(200,400)",
                "CroppedImage(200,400)",
            ]
        );
    }

    #[test]
    fn override_args_only_affect_default() {
        let (result, _) = build(EXAMPLE, "Example", &[Arg::Int(50), Arg::Int(60)]);
        let payload = result.unwrap();
        assert_eq!(payload.sizes[0].image.url, "/mock/CroppedImage/200x100");
        assert_eq!(payload.sizes[1].image.url, "/mock/CroppedImage/200x400");
        assert_eq!(payload.default_image.url, "/mock/CroppedImage/50x60");
    }

    #[test]
    fn empty_override_falls_back_to_set_default() {
        let (result, _) = build(EXAMPLE, "Example", &[]);
        assert_eq!(
            result.unwrap().default_image.url,
            "/mock/CroppedImage/200x400"
        );
    }

    #[test]
    fn global_defaults_fill_in_method_and_default_args() {
        let (result, formatter) = build(
            r#"
[sets.Plain.arguments]
"(min-width: 400px)" = [400]
"#,
            "Plain",
            &[],
        );
        result.unwrap();
        assert_eq!(
            formatter.call_strings(),
            vec!["SetWidth(400)", "SetWidth(800,600)"]
        );
    }

    #[test]
    fn blank_method_uses_global_default() {
        let (result, formatter) = build(
            r#"
[sets.Blank]
method = ""
arguments = { "(min-width: 400px)" = [400] }
"#,
            "Blank",
            &[],
        );
        result.unwrap();
        assert_eq!(formatter.call_strings()[0], "SetWidth(400)");
    }

    #[test]
    fn leading_method_name_in_default_args_is_used_directly() {
        let (result, formatter) = build(
            r#"
[sets.Thumb]
method = "CroppedImage"
default_arguments = ["SetWidth", 300]
arguments = { "(min-width: 400px)" = [400, 400] }
"#,
            "Thumb",
            &[],
        );
        let payload = result.unwrap();
        assert_eq!(payload.default_image.url, "/mock/SetWidth/300");
        assert_eq!(formatter.call_strings()[1], "SetWidth(300)");
    }

    #[test]
    fn leading_method_name_in_override_is_used_directly() {
        let (result, _) = build(EXAMPLE, "Example", &[Arg::from("SetHeight"), Arg::Int(90)]);
        assert_eq!(result.unwrap().default_image.url, "/mock/SetHeight/90");
    }

    #[test]
    fn leading_unknown_name_gets_method_prepended() {
        let (result, formatter) = build(EXAMPLE, "Example", &[Arg::from("Sepia"), Arg::Int(90)]);
        // Passed through to the set's method; the formatter decides what it means
        result.unwrap();
        assert_eq!(formatter.call_strings()[2], "CroppedImage(Sepia,90)");
    }

    #[test]
    fn numeric_first_argument_is_never_a_method() {
        let (result, formatter) = build(EXAMPLE, "Example", &[Arg::Int(640), Arg::Int(480)]);
        result.unwrap();
        assert_eq!(formatter.call_strings()[2], "CroppedImage(640,480)");
    }

    // =========================================================================
    // Requirements
    // =========================================================================

    #[test]
    fn script_is_required_once_across_builds() {
        let config = parse_config(EXAMPLE).unwrap();
        let formatter = MockFormatter::new();
        let builder = SetBuilder::new(&config, &formatter);
        let example = set(&config, "Example");
        let mut req = Requirements::new();

        builder
            .create_responsive_set(&example, &[], "Example", &mut req)
            .unwrap();
        builder
            .create_responsive_set(&example, &[], "Example", &mut req)
            .unwrap();

        assert_eq!(req.scripts(), ["javascript/picturefill.min.js"]);
    }

    #[test]
    fn failed_build_requires_nothing() {
        let config = parse_config(
            r#"
[sets.Broken]
method = "CroppedImage"
"#,
        )
        .unwrap();
        let formatter = MockFormatter::new();
        let mut req = Requirements::new();
        let result = SetBuilder::new(&config, &formatter).create_responsive_set(
            &set(&config, "Broken"),
            &[],
            "Broken",
            &mut req,
        );
        assert!(result.is_err());
        assert!(req.is_empty());
    }

    // =========================================================================
    // Validation errors
    // =========================================================================

    #[test]
    fn missing_arguments() {
        let (result, formatter) = build(
            r#"
[sets.Hero]
method = "CroppedImage"
"#,
            "Hero",
            &[],
        );
        assert_eq!(
            result.unwrap_err(),
            BuildError::MissingArguments { set: "Hero".into() }
        );
        assert!(formatter.get_calls().is_empty());
    }

    #[test]
    fn empty_arguments_table() {
        let (result, _) = build(
            r#"
[sets.Hero]
arguments = {}
"#,
            "Hero",
            &[],
        );
        assert!(matches!(result, Err(BuildError::MissingArguments { .. })));
    }

    #[test]
    fn numeric_query_is_invalid() {
        let (result, _) = build(
            r#"
[sets.Hero.arguments]
"0" = [200, 100]
"#,
            "Hero",
            &[],
        );
        assert_eq!(
            result.unwrap_err(),
            BuildError::InvalidMediaQuery {
                set: "Hero".into(),
                query: "0".into(),
            }
        );
    }

    #[test]
    fn empty_query_is_invalid() {
        let (result, _) = build(
            r#"
[sets.Hero.arguments]
"" = [200, 100]
"#,
            "Hero",
            &[],
        );
        assert!(matches!(
            result,
            Err(BuildError::InvalidMediaQuery { query, .. }) if query.is_empty()
        ));
    }

    #[test]
    fn positional_arguments_are_invalid_queries() {
        let (result, _) = build(
            r#"
[sets.Hero]
arguments = [[200, 100]]
"#,
            "Hero",
            &[],
        );
        assert!(matches!(
            result,
            Err(BuildError::InvalidMediaQuery { query, .. }) if query == "0"
        ));
    }

    #[test]
    fn empty_breakpoint_list() {
        let (result, _) = build(
            r#"
[sets.Hero.arguments]
"(min-width: 200px)" = []
"#,
            "Hero",
            &[],
        );
        assert_eq!(
            result.unwrap_err(),
            BuildError::MissingBreakpointArguments {
                set: "Hero".into(),
                query: "(min-width: 200px)".into(),
            }
        );
    }

    #[test]
    fn scalar_breakpoint_is_missing_list() {
        let (result, _) = build(
            r#"
[sets.Hero.arguments]
"(min-width: 200px)" = 200
"#,
            "Hero",
            &[],
        );
        assert!(matches!(
            result,
            Err(BuildError::MissingBreakpointArguments { .. })
        ));
    }

    const MALFORMED: &str = r#"
[sets.Good]
arguments = { "(min-width: 400px)" = [400] }

[sets.Table.arguments]
"(min-width: 200px)" = { w = 200 }

[sets.Flag.arguments]
"(min-width: 200px)" = true

[sets.Float.arguments]
"(min-width: 200px)" = [1.5]

[sets.Text]
arguments = "oops"
"#;

    #[test]
    fn malformed_breakpoints_fail_at_build_time() {
        let (result, _) = build(MALFORMED, "Good", &[]);
        assert_eq!(result.unwrap().sizes.len(), 1);

        for name in ["Table", "Flag", "Float"] {
            let (result, formatter) = build(MALFORMED, name, &[]);
            assert_eq!(
                result.unwrap_err(),
                BuildError::MissingBreakpointArguments {
                    set: name.into(),
                    query: "(min-width: 200px)".into(),
                }
            );
            assert!(formatter.get_calls().is_empty());
        }
    }

    #[test]
    fn non_table_arguments_are_missing() {
        let (result, formatter) = build(MALFORMED, "Text", &[]);
        assert_eq!(
            result.unwrap_err(),
            BuildError::MissingArguments { set: "Text".into() }
        );
        assert!(formatter.get_calls().is_empty());
    }

    #[test]
    fn late_invalid_breakpoint_prevents_any_formatting() {
        let (result, formatter) = build(
            r#"
[sets.Hero.arguments]
"(min-width: 200px)" = [200]
"(min-width: 400px)" = [400]
"12" = [800]
"#,
            "Hero",
            &[],
        );
        assert!(result.is_err());
        assert!(formatter.get_calls().is_empty());
    }

    #[test]
    fn formatter_errors_propagate_unchanged() {
        let config = parse_config(EXAMPLE).unwrap();
        let formatter = MockFormatter::failing_on("CroppedImage");
        let mut req = Requirements::new();
        let err = SetBuilder::new(&config, &formatter)
            .create_responsive_set(&set(&config, "Example"), &[], "Example", &mut req)
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::Format(FormatError::invalid("CroppedImage", "mock failure"))
        );
        assert_eq!(
            err.to_string(),
            "invalid arguments for CroppedImage: mock failure"
        );
    }

    // =========================================================================
    // Focal-point cropping
    // =========================================================================

    const FOCUSED: &str = r#"
[sets.Focused]
method = "CroppedFocusedImage"
default_arguments = [300, 300]

[sets.Focused.arguments]
"(min-width: 800px)" = [800, 400]
"#;

    #[test]
    fn focal_crop_appends_axis_and_offset() {
        let config = parse_config(FOCUSED).unwrap();
        let formatter = MockFormatter::new();
        let crop = FixedCrop::x(12);
        let mut req = Requirements::new();
        SetBuilder::new(&config, &formatter)
            .with_focal_crop(Some(&crop))
            .create_responsive_set(&set(&config, "Focused"), &[], "Focused", &mut req)
            .unwrap();

        assert_eq!(
            formatter.call_strings(),
            vec![
                "CroppedFocusedImage(800,400,x,12)",
                "CroppedFocusedImage(300,300,x,12)",
            ]
        );
    }

    #[test]
    fn no_crop_collaborator_leaves_args_alone() {
        let (result, formatter) = build(FOCUSED, "Focused", &[]);
        result.unwrap();
        assert_eq!(formatter.call_strings()[0], "CroppedFocusedImage(800,400)");
    }

    #[test]
    fn crop_collaborator_ignored_for_other_methods() {
        let config = parse_config(EXAMPLE).unwrap();
        let formatter = MockFormatter::new();
        let crop = FixedCrop::x(12);
        let mut req = Requirements::new();
        SetBuilder::new(&config, &formatter)
            .with_focal_crop(Some(&crop))
            .create_responsive_set(&set(&config, "Example"), &[], "Example", &mut req)
            .unwrap();
        assert_eq!(formatter.call_strings()[0], "CroppedImage(200,100)");
    }

    fn build_with_crop(toml: &str, name: &str, crop: &FixedCrop) -> MockFormatter {
        let config = parse_config(toml).unwrap();
        let formatter = MockFormatter::new();
        let mut req = Requirements::new();
        SetBuilder::new(&config, &formatter)
            .with_focal_crop(Some(crop))
            .create_responsive_set(&set(&config, name), &[], name, &mut req)
            .unwrap();
        formatter
    }

    #[test]
    fn default_naming_focal_method_gets_crop_data() {
        let formatter = build_with_crop(
            r#"
[sets.Teaser]
method = "CroppedImage"
default_arguments = ["CroppedFocusedImage", 100, 100]
arguments = { "(min-width: 400px)" = [400, 200] }
"#,
            "Teaser",
            &FixedCrop::x(5),
        );
        assert_eq!(
            formatter.call_strings(),
            vec!["CroppedImage(400,200)", "CroppedFocusedImage(100,100,x,5)"]
        );
    }

    #[test]
    fn default_naming_plain_method_skips_crop_data() {
        let formatter = build_with_crop(
            r#"
[sets.Portrait]
method = "CroppedFocusedImage"
default_arguments = ["SetWidth", 300]
arguments = { "(min-width: 800px)" = [800, 400] }
"#,
            "Portrait",
            &FixedCrop::x(5),
        );
        assert_eq!(
            formatter.call_strings(),
            vec!["CroppedFocusedImage(800,400,x,5)", "SetWidth(300)"]
        );
    }

    #[test]
    fn focal_crop_needs_numeric_size() {
        let config = parse_config(
            r#"
[sets.Focused]
method = "CroppedFocusedImage"
arguments = { "(min-width: 800px)" = ["wide"] }
"#,
        )
        .unwrap();
        let formatter = MockFormatter::new();
        let crop = FixedCrop::x(0);
        let mut req = Requirements::new();
        let err = SetBuilder::new(&config, &formatter)
            .with_focal_crop(Some(&crop))
            .create_responsive_set(&set(&config, "Focused"), &[], "Focused", &mut req)
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Format(FormatError::InvalidArguments { .. })
        ));
    }

    // =========================================================================
    // Media query syntax
    // =========================================================================

    #[test]
    fn media_query_detection() {
        assert!(is_media_query("(min-width: 200px)"));
        assert!(is_media_query("print"));
        assert!(is_media_query("1x"));
        assert!(!is_media_query(""));
        assert!(!is_media_query("   "));
        assert!(!is_media_query("0"));
        assert!(!is_media_query("12"));
        assert!(!is_media_query("-3"));
        assert!(!is_media_query("1.5"));
        assert!(!is_media_query(".5"));
        assert!(!is_media_query("1e3"));
        assert!(!is_media_query(" 42 "));
    }

    #[test]
    fn numeric_edge_cases() {
        assert!(!is_numeric("."));
        assert!(!is_numeric("e5"));
        assert!(!is_numeric("1e"));
        assert!(!is_numeric("inf"));
        assert!(is_numeric("+7"));
        assert!(is_numeric("2."));
    }
}

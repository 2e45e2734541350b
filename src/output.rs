//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! 001 articlehero (ArticleHero)
//!     Method: CroppedImage
//!     Default: 1200, 600
//!     (min-width: 1200px): 1600, 800
//!     (min-width: 800px): 1200, 600
//! ```
//!
//! ## Check
//!
//! ```text
//! ok   ArticleHero (2 breakpoints)
//! FAIL Broken: responsive set 'Broken' has no breakpoint arguments
//!
//! 1 of 2 sets failed
//! ```
//!
//! ## Plan
//!
//! ```text
//! ArticleHero
//!     (min-width: 1200px) → assets/_resampled/CroppedImage-…-hero.jpg (1600x800)
//!     default → assets/_resampled/CroppedImage-…-hero.jpg (1200x600)
//! ```

use crate::config::{BreakpointArgs, Breakpoints, ResponsiveConfig};
use crate::dispatch::{SetCheck, SetRegistry};
use crate::imaging::Arg;
use crate::types::RenderPayload;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn join_args(args: &[Arg]) -> String {
    args.iter()
        .map(Arg::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_breakpoint(args: &BreakpointArgs) -> String {
    match args {
        BreakpointArgs::List(list) if list.is_empty() => "(empty)".to_string(),
        BreakpointArgs::List(list) => join_args(list),
        BreakpointArgs::Scalar(arg) => format!("{arg} (not a list)"),
        BreakpointArgs::Malformed(value) => format!("{value} (not a list of sizes)"),
    }
}

// ============================================================================
// List
// ============================================================================

/// Format every configured set with its method, default and breakpoints.
pub fn format_set_list(registry: &SetRegistry) -> Vec<String> {
    let config: &ResponsiveConfig = registry.config();
    let mut lines = Vec::new();

    if registry.resolver().is_empty() {
        lines.push("No responsive sets configured".to_string());
        return lines;
    }

    for (pos, (key, set)) in registry.resolver().iter().enumerate() {
        lines.push(format!("{} {} ({})", format_index(pos + 1), key, set.name));

        let method = match set.config.method.as_deref() {
            Some(m) if !m.trim().is_empty() => m.to_string(),
            _ => format!("{} (default)", config.default_method),
        };
        lines.push(format!("{}Method: {}", indent(1), method));

        let default = match &set.config.default_arguments {
            Some(args) => join_args(args),
            None => format!("{} (default)", join_args(&config.default_arguments)),
        };
        lines.push(format!("{}Default: {}", indent(1), default));

        match &set.config.arguments {
            Some(Breakpoints::Malformed(value)) => {
                lines.push(format!("{}arguments: {} (not a table)", indent(1), value));
            }
            Some(breakpoints) if !breakpoints.is_empty() => {
                for (query, args) in breakpoints.entries() {
                    lines.push(format!(
                        "{}{}: {}",
                        indent(1),
                        query,
                        describe_breakpoint(args)
                    ));
                }
            }
            _ => lines.push(format!("{}(no breakpoints)", indent(1))),
        }
    }

    lines
}

pub fn print_set_list(registry: &SetRegistry) {
    for line in format_set_list(registry) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format check results, one line per set plus a summary.
pub fn format_check_report(checks: &[SetCheck]) -> Vec<String> {
    let mut lines: Vec<String> = checks
        .iter()
        .map(|check| match &check.result {
            Ok(1) => format!("ok   {} (1 breakpoint)", check.name),
            Ok(n) => format!("ok   {} ({} breakpoints)", check.name, n),
            Err(e) => format!("FAIL {}: {}", check.name, e),
        })
        .collect();

    let failed = checks.iter().filter(|c| c.result.is_err()).count();
    lines.push(String::new());
    if failed == 0 {
        lines.push(format!("All {} sets are valid", checks.len()));
    } else {
        lines.push(format!("{} of {} sets failed", failed, checks.len()));
    }
    lines
}

pub fn print_check_report(checks: &[SetCheck]) {
    for line in format_check_report(checks) {
        println!("{}", line);
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Format a payload as a plain list of renditions.
pub fn format_payload(payload: &RenderPayload) -> Vec<String> {
    let mut lines = vec![payload.set_name.clone()];
    for size in &payload.sizes {
        lines.push(format!(
            "{}{} → {} ({}x{})",
            indent(1),
            size.query,
            size.image.url,
            size.image.width,
            size.image.height
        ));
    }
    let default = &payload.default_image;
    lines.push(format!(
        "{}default → {} ({}x{})",
        indent(1),
        default.url,
        default.width,
        default.height
    ));
    lines
}

pub fn print_payload(payload: &RenderPayload) {
    for line in format_payload(payload) {
        println!("{}", line);
    }
}

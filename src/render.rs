//! Markup for responsive sets.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating, so
//! media queries, URLs and alt text are escaped automatically.
//!
//! ## Templates
//!
//! - **`ResponsiveImageSet`**: a `<picture>` with one `<source>` per rendition
//!   in configured order, then an `<img>` for the default rendition.
//!
//! ```html
//! <picture class="responsive-image-set" data-set="ArticleHero">
//!   <source media="(min-width: 1200px)" srcset="…/CroppedImage-…-hero.jpg">
//!   <source media="(min-width: 800px)" srcset="…">
//!   <img src="…" width="1200" height="600" alt="Hero">
//! </picture>
//! ```
//!
//! [`preview_page`] wraps rendered sets in a full document together with the
//! `<script>` tags declared on a [`Requirements`] collector.

use crate::builder::BuildError;
use crate::requirements::Requirements;
use crate::types::RenderPayload;
use maud::{DOCTYPE, Markup, html};
use thiserror::Error;

/// Name of the stock template for responsive sets.
pub const RESPONSIVE_IMAGE_SET: &str = "ResponsiveImageSet";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Turns a named template plus a payload into markup.
pub trait TemplateRenderer: Sync {
    fn render(&self, template: &str, payload: &RenderPayload) -> Result<Markup, RenderError>;
}

/// The built-in Maud templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaudTemplates;

impl TemplateRenderer for MaudTemplates {
    fn render(&self, template: &str, payload: &RenderPayload) -> Result<Markup, RenderError> {
        match template {
            RESPONSIVE_IMAGE_SET => Ok(responsive_image_set(payload)),
            other => Err(RenderError::UnknownTemplate(other.to_string())),
        }
    }
}

/// Renders the `<picture>` element for one payload.
pub fn responsive_image_set(payload: &RenderPayload) -> Markup {
    let alt = payload.title.as_deref().unwrap_or("");
    let default = &payload.default_image;

    html! {
        picture.responsive-image-set data-set=(payload.set_name) {
            @for size in &payload.sizes {
                source media=(size.query) srcset=(size.image.url);
            }
            img src=(default.url) width=(default.width) height=(default.height) alt=(alt);
        }
    }
}

/// Renders `<script>` tags for every declared requirement.
pub fn render_scripts(requirements: &Requirements) -> Markup {
    html! {
        @for src in requirements.scripts() {
            script src=(src) {}
        }
    }
}

/// Renders a standalone HTML page around already-rendered sets.
pub fn preview_page(title: &str, body: Markup, requirements: &Requirements) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                (render_scripts(requirements))
            }
            body {
                (body)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Template-call surface for responsive sets.
//!
//! Templates call sets by name on an image: `image.ArticleHero` or
//! `image.ArticleHero(400, 200)`. Rather than intercepting unknown method
//! calls, every configured set is registered up front in a [`SetRegistry`]
//! keyed by lower-cased name. A [`ResponsiveImage`] binds the registry to one
//! image's formatter and answers calls explicitly:
//!
//! - a configured name builds and renders the set;
//! - any other name returns `None`, leaving the call to whatever the host
//!   does with methods it doesn't know.

use crate::builder::{BuildError, SetBuilder};
use crate::config::ResponsiveConfig;
use crate::imaging::{Arg, FocalCrop, FocusPoint, ImageFormatter, ResampleBackend, SourceImage};
use crate::render::{RenderError, TemplateRenderer};
use crate::requirements::Requirements;
use crate::resolver::{NamedSet, SetResolver};
use crate::types::RenderPayload;
use maud::Markup;

/// Configured sets plus the global defaults they build against.
///
/// Immutable once constructed; share it by reference across renders.
#[derive(Debug, Clone)]
pub struct SetRegistry {
    config: ResponsiveConfig,
    resolver: SetResolver,
}

impl SetRegistry {
    pub fn new(config: ResponsiveConfig) -> Self {
        let resolver = SetResolver::new(&config);
        Self { config, resolver }
    }

    pub fn config(&self) -> &ResponsiveConfig {
        &self.config
    }

    pub fn resolver(&self) -> &SetResolver {
        &self.resolver
    }

    /// The set a call named `name` dispatches to, if any.
    pub fn handler(&self, name: &str) -> Option<&NamedSet> {
        self.resolver.get(name)
    }

    /// Every dynamically callable name: the lower-cased set names.
    pub fn method_names(&self) -> Vec<String> {
        self.resolver.list_available_sets()
    }

    /// Build every set against a placeholder image.
    ///
    /// Surfaces configuration errors that would otherwise only appear when a
    /// template first renders the set, including arguments the stock
    /// formatter rejects.
    pub fn check_all(&self) -> Vec<SetCheck> {
        let placeholder = SourceImage::new(PLACEHOLDER_PATH, 4000, 3000);
        let formatter = ResampleBackend::new(placeholder.clone());
        let focus = FocusPoint::new(0.0, 0.0, placeholder.dimensions());
        let builder = SetBuilder::new(&self.config, &formatter).with_focal_crop(Some(&focus));

        self.resolver
            .iter()
            .map(|(_, set)| {
                let mut requirements = Requirements::new();
                let result = builder
                    .create_responsive_set(&set.config, &[], &set.name, &mut requirements)
                    .map(|payload| payload.sizes.len());
                SetCheck {
                    name: set.name.clone(),
                    result,
                }
            })
            .collect()
    }
}

const PLACEHOLDER_PATH: &str = "check/placeholder.jpg";

/// Outcome of building one set during [`SetRegistry::check_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct SetCheck {
    pub name: String,
    /// Number of breakpoint renditions on success.
    pub result: Result<usize, BuildError>,
}

/// An image with responsive sets attached.
pub struct ResponsiveImage<'a> {
    registry: &'a SetRegistry,
    formatter: &'a dyn ImageFormatter,
    templates: &'a dyn TemplateRenderer,
    focal_crop: Option<&'a dyn FocalCrop>,
    title: Option<String>,
}

impl<'a> ResponsiveImage<'a> {
    pub fn new(
        registry: &'a SetRegistry,
        formatter: &'a dyn ImageFormatter,
        templates: &'a dyn TemplateRenderer,
    ) -> Self {
        Self {
            registry,
            formatter,
            templates,
            focal_crop: None,
            title: None,
        }
    }

    /// Crop focal-crop renditions around this image's focus point.
    pub fn with_focal_crop(mut self, focal_crop: &'a dyn FocalCrop) -> Self {
        self.focal_crop = Some(focal_crop);
        self
    }

    /// Alt text for the rendered `<img>`.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Names this image answers to besides its own methods.
    pub fn method_names(&self) -> Vec<String> {
        self.registry.method_names()
    }

    pub fn has_set(&self, name: &str) -> bool {
        self.registry.handler(name).is_some()
    }

    /// Build the payload for set `name`, or `None` if no such set exists.
    ///
    /// `args` override the set's default rendition arguments when non-empty.
    pub fn payload(
        &self,
        name: &str,
        args: &[Arg],
        requirements: &mut Requirements,
    ) -> Option<Result<RenderPayload, BuildError>> {
        let Some(set) = self.registry.handler(name) else {
            tracing::debug!(name, "not a responsive set");
            return None;
        };
        let builder = SetBuilder::new(self.registry.config(), self.formatter)
            .with_focal_crop(self.focal_crop);
        let result = builder
            .create_responsive_set(&set.config, args, &set.name, requirements)
            .map(|mut payload| {
                payload.title = self.title.clone();
                payload
            });
        Some(result)
    }

    /// Build and render set `name`, or `None` if no such set exists.
    pub fn call(
        &self,
        name: &str,
        args: &[Arg],
        requirements: &mut Requirements,
    ) -> Option<Result<Markup, RenderError>> {
        let payload = self.payload(name, args, requirements)?;
        let template = &self.registry.config().template;
        Some(
            payload
                .map_err(RenderError::from)
                .and_then(|payload| self.templates.render(template, &payload)),
        )
    }
}

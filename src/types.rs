//! Types handed from the set builder to templates.
//!
//! Both are transient: a payload is created for one template evaluation and
//! dropped once the markup is rendered. They serialize with the key names
//! templates use (`Sizes`, `DefaultImage`, `Query`, `Image`).

use crate::imaging::ImageHandle;
use serde::Serialize;

/// One generated image selected by a media query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rendition {
    pub query: String,
    pub image: ImageHandle,
}

/// Everything a template needs to render a responsive set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RenderPayload {
    /// Name of the set as configured (original casing).
    pub set_name: String,
    /// Renditions in configured order; order is media-query precedence.
    pub sizes: Vec<Rendition>,
    pub default_image: ImageHandle,
    /// Alt text taken from the host image, if it has a title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

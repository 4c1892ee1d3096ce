//! Shared types passed between the readers, the resolver, and the consumers.
//!
//! Products and gallery images are read-only snapshots built per request. The
//! result types are what the storefront serializes for the browser-side
//! behavior layer, so their JSON field names are camelCase.

use crate::config::{AnimationType, FlipConfig};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Attribute value meaning "an image role exists but nothing is assigned".
pub const NO_SELECTION: &str = "no_selection";

/// Position given to gallery images that have none, so they sort last.
pub const UNPOSITIONED: i32 = 999;

/// A catalog product as seen by the resolver.
///
/// `attributes` holds whatever the listing collection loaded into memory;
/// dedicated image attributes that were not preloaded are looked up through
/// the entity store instead. `gallery` is `None` when the media gallery was not
/// loaded with the product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Entity id. Unsaved products have none and never hit the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub sku: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<GalleryImage>>,
}

impl Product {
    /// In-memory attribute value, or `None` for absent, empty, and
    /// `no_selection` values.
    pub fn attribute(&self, code: &str) -> Option<&str> {
        self.attributes
            .get(code)
            .map(String::as_str)
            .filter(|v| is_image_value(v))
    }
}

/// One entry of a product's media gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Opaque storage reference, e.g. `/h/o/hover.jpg`.
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(default)]
    pub disabled: bool,
    /// Role tags. Accepts a list or a comma-separated string.
    #[serde(default, deserialize_with = "deserialize_types")]
    pub types: Vec<String>,
    /// `image`, `external-video`, ... Absent means an image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl GalleryImage {
    pub fn has_type(&self, role: &str) -> bool {
        self.types.iter().any(|t| t == role)
    }

    /// True unless the entry is another kind of media, such as a video.
    pub fn is_image(&self) -> bool {
        self.media_type.as_deref().is_none_or(|t| t == "image")
    }

    /// Ordering key: explicit position, or [`UNPOSITIONED`].
    pub fn sort_position(&self) -> i32 {
        self.position.unwrap_or(UNPOSITIONED)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TypesRepr {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_types<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let types = match Option::<TypesRepr>::deserialize(deserializer)? {
        Some(TypesRepr::List(list)) => list,
        Some(TypesRepr::Csv(csv)) => csv
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    };
    Ok(types)
}

/// True when a stored value points at an actual image.
pub fn is_image_value(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != NO_SELECTION
}

/// The secondary image chosen for a product, ready to serve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    pub url: String,
    /// Role (or the `second_image` sentinel) that produced the reference.
    pub source_role: String,
    /// True when the fallback step of the chain produced it.
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Per-product outcome handed to the template layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    pub has_image: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_image: Option<ResolvedImage>,
    pub animation_type: AnimationType,
    pub animation_speed_ms: u32,
}

impl ResolutionResult {
    /// A result with no secondary image, still carrying animation settings.
    pub fn none(config: &FlipConfig) -> Self {
        Self {
            has_image: false,
            resolved_image: None,
            animation_type: config.general.animation_type,
            animation_speed_ms: config.general.effective_animation_speed(),
        }
    }

    pub fn found(image: ResolvedImage, config: &FlipConfig) -> Self {
        Self {
            has_image: true,
            resolved_image: Some(image),
            animation_type: config.general.animation_type,
            animation_speed_ms: config.general.effective_animation_speed(),
        }
    }

    /// Flip URL when an image was resolved.
    pub fn url(&self) -> Option<&str> {
        self.resolved_image.as_ref().map(|i| i.url.as_str())
    }
}

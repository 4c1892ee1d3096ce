//! Shared test utilities for the flip-hover test suite.
//!
//! Builders for products and gallery images, plus the markup fragments the
//! injector is expected to recognize.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let product = product_with(
//!     1,
//!     &[("hover_image", "no_selection")],
//!     vec![image("a.jpg", Some(1)), tagged("x.jpg", Some(2), &["hover_image"])],
//! );
//! ```

use crate::config::FlipConfig;
use crate::types::{GalleryImage, Product};

// =========================================================================
// Gallery builders
// =========================================================================

/// Enabled, untagged gallery image.
pub fn image(file: &str, position: Option<i32>) -> GalleryImage {
    GalleryImage {
        file: file.to_string(),
        position,
        disabled: false,
        types: Vec::new(),
        media_type: None,
    }
}

/// Enabled gallery image carrying role tags.
pub fn tagged(file: &str, position: Option<i32>, types: &[&str]) -> GalleryImage {
    GalleryImage {
        types: types.iter().map(|t| t.to_string()).collect(),
        ..image(file, position)
    }
}

/// Disabled gallery image.
pub fn disabled(file: &str, position: Option<i32>) -> GalleryImage {
    GalleryImage {
        disabled: true,
        ..image(file, position)
    }
}

/// Enabled gallery entry of a non-image media type.
pub fn video(file: &str, position: Option<i32>) -> GalleryImage {
    GalleryImage {
        media_type: Some("external-video".to_string()),
        ..image(file, position)
    }
}

// =========================================================================
// Product builders
// =========================================================================

/// Product with an id, in-memory attributes, and a loaded gallery.
pub fn product_with(id: u64, attributes: &[(&str, &str)], gallery: Vec<GalleryImage>) -> Product {
    Product {
        id: Some(id),
        sku: format!("SKU-{id}"),
        attributes: attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        gallery: Some(gallery),
    }
}

/// Product with only a loaded gallery.
pub fn product_with_gallery(gallery: Vec<GalleryImage>) -> Product {
    product_with(1, &[], gallery)
}

// =========================================================================
// Config builders
// =========================================================================

/// Default config with the given role chain.
pub fn config_with_roles(primary: &str, fallback: &str) -> FlipConfig {
    let mut config = FlipConfig::default();
    config.general.primary_role = primary.to_string();
    config.general.fallback_role = fallback.to_string();
    config
}

// =========================================================================
// Markup fixtures
// =========================================================================

/// The listing image block as the storefront template renders it.
pub const LISTING_IMAGE_HTML: &str = r#"<span class="product-image-container product-image-container-42" style="width:240px;"><span class="product-image-wrapper" style="padding-bottom: 125%;"><img class="product-image-photo" src="/media/catalog/product/cache/abc/m/j/mj01.jpg" loading="lazy" width="240" height="300" alt="Hero Hoodie"/></span></span>"#;

//! Servable URLs for resolved references.
//!
//! The resizer is asked first. Its failures degrade to the raw media URL of
//! the stored file and never reach the caller.

use super::backend::ImageResizer;
use crate::config::MediaConfig;
use crate::types::Product;
use tracing::warn;

/// Raw media URL of a stored file: `{base_url}/catalog/product/{file}`.
pub fn media_url(base_url: &str, file: &str) -> String {
    format!(
        "{}/catalog/product/{}",
        base_url.trim_end_matches('/'),
        file.trim().trim_start_matches('/')
    )
}

/// Servable URL for `file`.
///
/// Asks the resizer for `preset` (or `media.default_preset` when `None` or
/// empty). Any resizer failure, or an empty answer, degrades to
/// [`media_url`] and is logged; it is never returned to the caller.
pub fn build_image_url<Z: ImageResizer + ?Sized>(
    resizer: &Z,
    media: &MediaConfig,
    product: &Product,
    file: &str,
    preset: Option<&str>,
) -> String {
    let preset = preset
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(media.default_preset.as_str());

    match resizer.build_url(product, preset, file) {
        Ok(url) if !url.trim().is_empty() => url,
        Ok(_) => {
            warn!(sku = %product.sku, file, preset, "resizer returned an empty URL, serving raw media URL");
            media_url(&media.base_url, file)
        }
        Err(err) => {
            warn!(sku = %product.sku, file, preset, error = %err, "resize failed, serving raw media URL");
            media_url(&media.base_url, file)
        }
    }
}

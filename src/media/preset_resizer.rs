//! Cache-path URLs for resize presets.
//!
//! Resized copies live under a directory named after the preset's
//! parameters, not its name:
//!
//! ```text
//! {base_url}/catalog/product/cache/{params_hash}/{file}
//! ```
//!
//! Renaming a preset keeps its URLs; changing its dimensions moves them, so
//! stale resized copies are never served under the new parameters. The hash
//! is SHA-256 of the dimensions, truncated to 32 hex characters.

use super::backend::{ImageResizer, ResizeError};
use crate::config::{FlipConfig, PresetConfig};
use crate::types::{NO_SELECTION, Product};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

const HASH_LEN: usize = 32;

/// [`ImageResizer`] that maps configured presets to cache paths.
#[derive(Debug, Clone)]
pub struct PresetResizer {
    base_url: String,
    presets: BTreeMap<String, PresetConfig>,
}

impl PresetResizer {
    pub fn new(base_url: &str, presets: BTreeMap<String, PresetConfig>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            presets,
        }
    }

    pub fn from_config(config: &FlipConfig) -> Self {
        Self::new(&config.media.base_url, config.presets.clone())
    }
}

impl ImageResizer for PresetResizer {
    fn build_url(
        &self,
        _product: &Product,
        preset: &str,
        file: &str,
    ) -> Result<String, ResizeError> {
        let params = self
            .presets
            .get(preset)
            .ok_or_else(|| ResizeError::UnknownPreset(preset.to_string()))?;
        let file = validate_reference(file)?;
        Ok(format!(
            "{}/catalog/product/cache/{}/{}",
            self.base_url,
            hash_preset_params(params),
            file
        ))
    }
}

/// Strip the leading slash and reject references that cannot name a file.
fn validate_reference(file: &str) -> Result<&str, ResizeError> {
    let trimmed = file.trim().trim_start_matches('/');
    if trimmed.is_empty()
        || trimmed == NO_SELECTION
        || trimmed.split('/').any(|segment| segment == "..")
    {
        return Err(ResizeError::InvalidReference(file.to_string()));
    }
    Ok(trimmed)
}

/// SHA-256 of a preset's dimensions, as a 32-character hex string.
pub fn hash_preset_params(preset: &PresetConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"preset\0");
    hasher.update(preset.width.to_le_bytes());
    match preset.height {
        Some(height) => {
            hasher.update(b"\x01");
            hasher.update(height.to_le_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(HASH_LEN);
    hex
}

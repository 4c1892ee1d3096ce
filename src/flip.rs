//! Resolution facade: one call per product, one [`ResolutionResult`] back.
//!
//! ```text
//! config.enabled? ──no──▶ no image (no reads at all)
//!        │ yes
//!        ▼
//! resolve_chain(primary, fallback) ──miss──▶ no image
//!        │ hit
//!        ▼
//! build_image_url(preset) ──▶ ResolutionResult { hasImage, url, animation }
//! ```
//!
//! Configuration is a parameter of every call, never state of the resolver,
//! so one resolver serves every store scope and every location.

use crate::catalog::{CatalogReader, StoreError};
use crate::config::{FlipConfig, Location, SECOND_IMAGE};
use crate::media::{ImageResizer, build_image_url};
use crate::resolve::{RoleChain, resolve_chain};
use crate::types::{Product, ResolutionResult, ResolvedImage};
use rayon::prelude::*;

/// Resolves secondary images against a catalog reader and a resizer.
#[derive(Clone, Copy)]
pub struct FlipResolver<'a> {
    reader: &'a dyn CatalogReader,
    resizer: &'a dyn ImageResizer,
}

impl<'a> FlipResolver<'a> {
    pub fn new(reader: &'a dyn CatalogReader, resizer: &'a dyn ImageResizer) -> Self {
        Self { reader, resizer }
    }

    /// Secondary image for `product` under `config`.
    ///
    /// `preset` names the resize preset; `None` uses `media.default_preset`.
    /// Only a failing entity store is an error.
    pub fn resolve_for(
        &self,
        product: &Product,
        config: &FlipConfig,
        preset: Option<&str>,
    ) -> Result<ResolutionResult, StoreError> {
        if !config.general.enabled {
            return Ok(ResolutionResult::none(config));
        }

        let chain = RoleChain::from_config(&config.general);
        let Some(hit) = resolve_chain(self.reader, product, &chain)? else {
            return Ok(ResolutionResult::none(config));
        };

        let url = build_image_url(self.resizer, &config.media, product, &hit.file, preset);
        Ok(ResolutionResult::found(
            ResolvedImage {
                url,
                source_role: hit.role,
                fallback: hit.fallback,
                width: None,
                height: None,
                alt: None,
            },
            config,
        ))
    }

    /// Like [`resolve_for`](Self::resolve_for), but also short-circuits when
    /// `location` is switched off.
    pub fn resolve_for_location(
        &self,
        product: &Product,
        config: &FlipConfig,
        location: Location,
        preset: Option<&str>,
    ) -> Result<ResolutionResult, StoreError> {
        if !config.is_enabled_for(location) {
            return Ok(ResolutionResult::none(config));
        }
        self.resolve_for(product, config, preset)
    }

    pub fn has_flip_image(&self, product: &Product, config: &FlipConfig) -> Result<bool, StoreError> {
        Ok(self.resolve_for(product, config, None)?.has_image)
    }

    /// Resolve many products in parallel. Results keep input order; the
    /// first store fault aborts the batch.
    pub fn resolve_batch(
        &self,
        products: &[Product],
        config: &FlipConfig,
        preset: Option<&str>,
    ) -> Result<Vec<ResolutionResult>, StoreError> {
        products
            .par_iter()
            .map(|product| self.resolve_for(product, config, preset))
            .collect()
    }
}

/// Attribute codes a listing must load with its products so the chain can
/// be answered from memory.
///
/// Primary first, then the fallback if distinct. The `second_image`
/// sentinel is not an attribute and is left out. Empty when disabled.
pub fn preload_roles(config: &FlipConfig) -> Vec<String> {
    if !config.general.enabled {
        return Vec::new();
    }
    RoleChain::from_config(&config.general)
        .steps()
        .map(|(role, _)| role)
        .filter(|role| !role.is_empty() && *role != SECOND_IMAGE)
        .map(String::from)
        .collect()
}

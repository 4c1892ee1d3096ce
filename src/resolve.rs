//! Secondary image reference resolution.
//!
//! A *role* names where the secondary image lives. Operators configure it
//! without knowing how the catalog models it, so one role name is tried two
//! ways, in this order:
//!
//! 1. **Attribute**: a dedicated image attribute holding one path
//!    (`hover_image = "/h/o/hover.jpg"`).
//! 2. **Gallery tag**: the first gallery image whose `types` contain the role.
//!
//! The `second_image` sentinel skips both and picks the second enabled
//! gallery image by position, for catalogs that never tag alternate views.
//!
//! ## The chain
//!
//! ```text
//! primary_role  ──hit──▶ done
//!      │ miss
//!      ▼
//! fallback_role ──hit──▶ done (fallback = true)
//!      │ miss
//!      ▼
//!    none
//! ```
//!
//! The fallback is skipped entirely when it is empty or equal to the
//! primary. Steps run strictly in order; a primary hit returns before the
//! fallback role is read at all.

use crate::catalog::{CatalogReader, StoreError};
use crate::config::{GeneralConfig, SECOND_IMAGE};
use crate::types::{GalleryImage, Product, is_image_value};
use tracing::debug;

/// A reference found by the chain, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHit {
    /// Raw storage reference.
    pub file: String,
    /// Role that produced it.
    pub role: String,
    /// True when the fallback step produced it.
    pub fallback: bool,
}

/// Ordered (primary, fallback) role pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleChain<'c> {
    primary: &'c str,
    fallback: Option<&'c str>,
}

impl<'c> RoleChain<'c> {
    pub fn new(primary: &'c str, fallback: &'c str) -> Self {
        let primary = primary.trim();
        let fallback = fallback.trim();
        Self {
            primary,
            fallback: (!fallback.is_empty() && fallback != primary).then_some(fallback),
        }
    }

    pub fn from_config(general: &'c GeneralConfig) -> Self {
        Self::new(&general.primary_role, &general.fallback_role)
    }

    pub fn primary(&self) -> &'c str {
        self.primary
    }

    /// The fallback role, if it will ever be consulted.
    pub fn fallback(&self) -> Option<&'c str> {
        self.fallback
    }

    /// Roles in the order they are tried, each flagged `true` for the fallback.
    pub fn steps(&self) -> impl Iterator<Item = (&'c str, bool)> + use<'c> {
        std::iter::once((self.primary, false)).chain(self.fallback.map(|role| (role, true)))
    }
}

/// Resolve one role to a raw file reference.
///
/// Missing data is `Ok(None)`; only reader faults are errors.
pub fn resolve_role<R: CatalogReader + ?Sized>(
    reader: &R,
    product: &Product,
    role: &str,
) -> Result<Option<String>, StoreError> {
    let role = role.trim();
    if role.is_empty() {
        return Ok(None);
    }

    if role == SECOND_IMAGE {
        let gallery = reader.gallery(product)?;
        return Ok(second_gallery_image(&gallery).map(String::from));
    }

    if let Some(value) = reader.attribute(product, role)?
        && is_image_value(&value)
    {
        return Ok(Some(value));
    }

    let gallery = reader.gallery(product)?;
    Ok(gallery_role_image(&gallery, role).map(String::from))
}

/// Second enabled gallery image by position.
///
/// Disabled images and non-image media (videos) are dropped before ordering,
/// so they never shift which image counts as second. Images without a
/// position sort as 999; ties keep gallery order.
pub fn second_gallery_image(gallery: &[GalleryImage]) -> Option<&str> {
    let mut enabled: Vec<&GalleryImage> = gallery
        .iter()
        .filter(|img| !img.disabled && img.is_image() && is_image_value(&img.file))
        .collect();
    enabled.sort_by_key(|img| img.sort_position());
    enabled.get(1).map(|img| img.file.as_str())
}

/// First gallery image tagged with `role`, in gallery order.
pub fn gallery_role_image<'g>(gallery: &'g [GalleryImage], role: &str) -> Option<&'g str> {
    gallery
        .iter()
        .find(|img| img.has_type(role) && is_image_value(&img.file))
        .map(|img| img.file.as_str())
}

/// Run the chain and return the first hit.
pub fn resolve_chain<R: CatalogReader + ?Sized>(
    reader: &R,
    product: &Product,
    chain: &RoleChain<'_>,
) -> Result<Option<ChainHit>, StoreError> {
    for (role, fallback) in chain.steps() {
        if let Some(file) = resolve_role(reader, product, role)? {
            debug!(sku = %product.sku, role, fallback, file = %file, "secondary image resolved");
            return Ok(Some(ChainHit {
                file,
                role: role.to_string(),
                fallback,
            }));
        }
    }
    debug!(sku = %product.sku, primary = chain.primary(), "no secondary image");
    Ok(None)
}

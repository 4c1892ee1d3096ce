//! Attribute and gallery readers.
//!
//! The resolver only ever asks two questions about a product: "what is the
//! value of attribute X?" and "what is in its gallery?". [`CatalogReader`]
//! is that seam, so tests can count exactly which reads a resolution made.

use super::store::{CATALOG_PRODUCT_ENTITY, EntityStore, StoreError};
use crate::types::{GalleryImage, Product, is_image_value};
use std::borrow::Cow;

/// Read access to one product's image data.
pub trait CatalogReader: Sync {
    /// Image reference stored under attribute `code`, if any.
    fn attribute(&self, product: &Product, code: &str) -> Result<Option<String>, StoreError>;

    /// The product's gallery in stored order.
    fn gallery<'p>(&self, product: &'p Product)
    -> Result<Cow<'p, [GalleryImage]>, StoreError>;
}

/// Reads only the in-memory snapshot. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotReader;

impl CatalogReader for SnapshotReader {
    fn attribute(&self, product: &Product, code: &str) -> Result<Option<String>, StoreError> {
        Ok(product.attribute(code).map(String::from))
    }

    fn gallery<'p>(
        &self,
        product: &'p Product,
    ) -> Result<Cow<'p, [GalleryImage]>, StoreError> {
        Ok(Cow::Borrowed(product.gallery.as_deref().unwrap_or(&[])))
    }
}

/// Reads the snapshot first and falls back to the entity store for
/// attributes the listing did not preload and galleries it did not load.
///
/// Products without an id are never looked up in the store.
pub struct StoreReader<'s, S: EntityStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: EntityStore + ?Sized> StoreReader<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }
}

impl<S: EntityStore + ?Sized> CatalogReader for StoreReader<'_, S> {
    fn attribute(&self, product: &Product, code: &str) -> Result<Option<String>, StoreError> {
        if let Some(value) = product.attribute(code) {
            return Ok(Some(value.to_string()));
        }
        let Some(entity_id) = product.id else {
            return Ok(None);
        };
        let Some(attribute_id) = self.store.attribute_id(code, CATALOG_PRODUCT_ENTITY)? else {
            return Ok(None);
        };
        let value = self.store.attribute_value(attribute_id, entity_id)?;
        Ok(value.filter(|v| is_image_value(v)))
    }

    fn gallery<'p>(
        &self,
        product: &'p Product,
    ) -> Result<Cow<'p, [GalleryImage]>, StoreError> {
        if let Some(gallery) = &product.gallery {
            return Ok(Cow::Borrowed(gallery));
        }
        match product.id {
            Some(entity_id) => Ok(Cow::Owned(self.store.gallery(entity_id)?)),
            None => Ok(Cow::Borrowed(&[])),
        }
    }
}

//! File-backed entity store.
//!
//! A catalog export in JSON: attribute definitions plus products with their
//! attribute values and galleries.
//!
//! ```json
//! {
//!   "attributes": [
//!     { "id": 90, "code": "hover_image", "label": "Hover Image", "frontend_input": "media_image" }
//!   ],
//!   "products": [
//!     {
//!       "id": 1, "sku": "MJ01",
//!       "attributes": { "image": "/m/j/mj01.jpg", "hover_image": "/m/j/mj01-back.jpg" },
//!       "gallery": [ { "file": "/m/j/mj01.jpg", "position": 1, "types": ["image"] } ]
//!     }
//!   ]
//! }
//! ```

use super::store::{AttributeInfo, EntityStore, StoreError};
use crate::types::{GalleryImage, Product, is_image_value};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    attributes: Vec<AttributeInfo>,
    #[serde(default)]
    products: Vec<Product>,
}

/// In-memory catalog loaded from a JSON export.
#[derive(Debug, Default)]
pub struct JsonCatalog {
    attributes: Vec<AttributeInfo>,
    products: Vec<Product>,
    /// Runtime index: entity id → position in `products`.
    by_id: HashMap<u64, usize>,
}

impl JsonCatalog {
    pub fn new(attributes: Vec<AttributeInfo>, products: Vec<Product>) -> Self {
        let by_id = products
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| p.id.map(|id| (id, idx)))
            .collect();
        Self {
            attributes,
            products,
            by_id,
        }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.attributes, file.products))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find_sku(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.sku == sku)
    }

    /// A listing-style snapshot of `product`: id and sku, only the attribute
    /// codes in `preload`, and no gallery. Everything else must come through
    /// the store, as it would for a product collection.
    pub fn listing_snapshot(&self, product: &Product, preload: &[String]) -> Product {
        Product {
            id: product.id,
            sku: product.sku.clone(),
            attributes: product
                .attributes
                .iter()
                .filter(|(code, _)| preload.contains(code))
                .map(|(code, value)| (code.clone(), value.clone()))
                .collect(),
            gallery: None,
        }
    }

    fn product(&self, entity_id: u64) -> Option<&Product> {
        self.by_id.get(&entity_id).map(|&idx| &self.products[idx])
    }
}

impl EntityStore for JsonCatalog {
    fn attribute_id(&self, code: &str, entity_type: &str) -> Result<Option<u32>, StoreError> {
        Ok(self
            .attributes
            .iter()
            .find(|a| a.code == code && a.entity_type == entity_type)
            .map(|a| a.id))
    }

    fn attribute_value(
        &self,
        attribute_id: u32,
        entity_id: u64,
    ) -> Result<Option<String>, StoreError> {
        let Some(code) = self
            .attributes
            .iter()
            .find(|a| a.id == attribute_id)
            .map(|a| a.code.as_str())
        else {
            return Ok(None);
        };
        Ok(self
            .product(entity_id)
            .and_then(|p| p.attributes.get(code))
            .filter(|v| is_image_value(v))
            .cloned())
    }

    fn gallery(&self, entity_id: u64) -> Result<Vec<GalleryImage>, StoreError> {
        Ok(self
            .product(entity_id)
            .and_then(|p| p.gallery.clone())
            .unwrap_or_default())
    }

    fn media_image_attributes(&self) -> Result<Vec<AttributeInfo>, StoreError> {
        Ok(self
            .attributes
            .iter()
            .filter(|a| a.is_media_image())
            .cloned()
            .collect())
    }
}

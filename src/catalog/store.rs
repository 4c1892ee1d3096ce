//! Entity store contract.
//!
//! Image roles can be dedicated product attributes that a listing did not
//! load into memory. Those are read in two steps, the same way the catalog
//! stores them: attribute code → attribute id (scoped to the product entity
//! type), then (attribute id, entity id) → value.

use crate::types::GalleryImage;
use thiserror::Error;

/// Entity type code of catalog products.
pub const CATALOG_PRODUCT_ENTITY: &str = "catalog_product";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("entity store unavailable: {0}")]
    Unavailable(String),
}

/// Attribute definition as listed by the store.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttributeInfo {
    pub id: u32,
    pub code: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_entity_type")]
    pub entity_type: String,
    #[serde(default)]
    pub frontend_input: String,
}

fn default_entity_type() -> String {
    CATALOG_PRODUCT_ENTITY.to_string()
}

impl AttributeInfo {
    pub fn is_media_image(&self) -> bool {
        self.frontend_input == "media_image"
    }
}

/// External attribute and gallery storage.
///
/// Implementations return `Ok(None)` / empty collections for anything that
/// does not exist, and `Err` only when the storage itself fails.
pub trait EntityStore: Sync {
    /// Attribute id for `code` within `entity_type`.
    fn attribute_id(&self, code: &str, entity_type: &str) -> Result<Option<u32>, StoreError>;

    /// Stored value of an attribute for one entity. Empty and `no_selection`
    /// values are reported as `None`.
    fn attribute_value(&self, attribute_id: u32, entity_id: u64)
    -> Result<Option<String>, StoreError>;

    /// Gallery images of an entity, in stored order.
    fn gallery(&self, entity_id: u64) -> Result<Vec<GalleryImage>, StoreError>;

    /// All product attributes whose frontend input is `media_image`.
    fn media_image_attributes(&self) -> Result<Vec<AttributeInfo>, StoreError>;
}

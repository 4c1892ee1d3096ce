//! Catalog access: how the resolver reads products.
//!
//! | Piece | Role |
//! |---|---|
//! | [`EntityStore`] | External attribute/gallery storage (id lookups) |
//! | [`CatalogReader`] | What the resolver calls: attribute and gallery reads for one product |
//! | [`SnapshotReader`] | Reads only what the product snapshot carries in memory |
//! | [`StoreReader`] | In-memory first, then the entity store |
//! | [`JsonCatalog`] | File-backed [`EntityStore`] used by the CLI and tests |
//! | [`roles`] | Selectable role options for configuration |
//!
//! Missing data is never an error at this layer. Only a store that cannot be
//! reached produces [`StoreError`].

mod json_store;
pub mod reader;
pub mod roles;
pub mod store;

pub use json_store::{CatalogError, JsonCatalog};
pub use reader::{CatalogReader, SnapshotReader, StoreReader};
pub use roles::{RoleOption, role_options};
pub use store::{AttributeInfo, CATALOG_PRODUCT_ENTITY, EntityStore, StoreError};

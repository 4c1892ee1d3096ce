//! # Flip Hover
//!
//! Secondary ("flip") images for product listings. For each product in a
//! listing, pick an alternate image to show while the shopper hovers the
//! primary one, turn it into a servable URL, and add it to the listing
//! markup the storefront already rendered.
//!
//! # Pipeline
//!
//! ```text
//! product ──▶ resolve_chain(primary, fallback) ──▶ build_image_url(preset) ──▶ decorate(markup)
//!              (attribute | gallery tag |            (resizer, raw media        (flip element +
//!               second gallery image)                 URL on failure)            container data)
//! ```
//!
//! Each stage is a plain function over trait seams, so the pipeline runs in
//! unit tests without a store, an image service, or a template engine:
//!
//! - [`catalog::CatalogReader`] answers attribute and gallery reads, from the
//!   loaded product first and the [`catalog::EntityStore`] second.
//! - [`media::ImageResizer`] turns a stored file into a resized URL.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Product, gallery, and result types shared by every stage |
//! | [`config`] | Layered `config.toml` loading (stock → default → store), validation, frontend JSON |
//! | [`catalog`] | Entity store contract, catalog readers, JSON catalog, role options |
//! | [`resolve`] | Role resolution and the primary → fallback chain |
//! | [`media`] | Resizer contract, preset-hash resizer, URL building with raw fallback |
//! | [`flip`] | Resolution facade: enablement, chain, URL, animation settings; batches |
//! | [`inject`] | Decorates rendered listing markup with the flip element |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Configuration Is an Argument
//!
//! [`flip::FlipResolver`] holds only its collaborators. The effective
//! configuration of a store scope is passed to every call, so one resolver
//! serves all scopes and tests never mutate shared settings.
//!
//! ## Image Problems Never Fail a Listing
//!
//! A product without a usable image yields a no-image result, and a resize
//! failure degrades to the raw media URL. Only an unreachable entity store
//! surfaces as an error ([`catalog::StoreError`]), since retrying may help.
//!
//! ## Decorate, Don't Re-render
//!
//! Listing templates differ per theme. [`inject`] matches the one element
//! every listing shares (`<img class="product-image-photo">`) and leaves the
//! rest of the markup byte-for-byte intact.

pub mod catalog;
pub mod config;
pub mod flip;
pub mod inject;
pub mod media;
pub mod output;
pub mod resolve;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

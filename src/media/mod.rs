//! Turning a raw storage reference into a servable URL.
//!
//! | Piece | Role |
//! |---|---|
//! | [`ImageResizer`] | Resize/cache collaborator contract, may fail |
//! | [`PresetResizer`] | Cache-path URLs keyed by a hash of the preset |
//! | [`build_image_url`] | Resizer first, raw media URL on any failure |
//!
//! URL building never fails from the caller's point of view: a broken
//! reference yields a best-effort URL, not an error.

pub mod backend;
mod preset_resizer;
mod url;

pub use backend::{ImageResizer, ResizeError};
pub use preset_resizer::{PresetResizer, hash_preset_params};
pub use url::{build_image_url, media_url};

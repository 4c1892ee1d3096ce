//! Selectable image roles.
//!
//! The option list offered for `primary_role` / `fallback_role`:
//!
//! 1. the empty option (no role),
//! 2. the `second_image` sentinel,
//! 3. every `media_image` attribute the store knows, merged with the native
//!    roles, sorted by label.
//!
//! If the store cannot be read, only the native roles follow the first two
//! options.

use super::store::EntityStore;
use crate::config::SECOND_IMAGE;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

const NATIVE_ROLES: [(&str, &str); 4] = [
    ("image", "Base Image"),
    ("small_image", "Small Image"),
    ("thumbnail", "Thumbnail"),
    ("swatch_image", "Swatch Image"),
];

/// One entry of the role selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleOption {
    pub value: String,
    pub label: String,
}

impl RoleOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Build the role option list from the store's image attributes.
pub fn role_options<S: EntityStore + ?Sized>(store: &S) -> Vec<RoleOption> {
    let mut options = vec![
        RoleOption::new("", "-- Select --"),
        RoleOption::new(SECOND_IMAGE, "Second Gallery Image (Position #2)"),
    ];

    match store.media_image_attributes() {
        Ok(attributes) => {
            let mut by_code: BTreeMap<String, String> = attributes
                .into_iter()
                .filter(|a| !a.code.is_empty())
                .map(|a| {
                    let label = if a.label.trim().is_empty() {
                        label_from_code(&a.code)
                    } else {
                        a.label
                    };
                    (a.code, label)
                })
                .collect();
            for (code, label) in NATIVE_ROLES {
                by_code
                    .entry(code.to_string())
                    .or_insert_with(|| label.to_string());
            }
            let mut roles: Vec<RoleOption> = by_code
                .into_iter()
                .map(|(value, label)| RoleOption { value, label })
                .collect();
            // Stable: equal labels keep code order from the BTreeMap.
            roles.sort_by(|a, b| a.label.cmp(&b.label));
            options.extend(roles);
        }
        Err(err) => {
            warn!(error = %err, "could not list image attributes, offering native roles only");
            options.extend(
                NATIVE_ROLES
                    .iter()
                    .map(|(code, label)| RoleOption::new(code, label)),
            );
        }
    }

    options
}

/// Human-readable label for an attribute code: `rpx_hover_image` → "Rpx Hover Image".
pub fn label_from_code(code: &str) -> String {
    code.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

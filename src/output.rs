//! CLI output formatting.
//!
//! Machine-readable results (`resolve`, `frontend-config`) are JSON on
//! stdout and are not formatted here. This module covers the human-readable
//! summaries.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Scope
//!     Config: config/config.toml
//!     Store: es_ar (config/stores/es_ar.toml)
//!
//! General
//!     Enabled: yes
//!     Roles: hover_image → second_image
//!     Animation: Slide Left (slide-left), 450ms
//!     Desktop only: yes
//!
//! Locations
//!     category_page: on
//!     cms_blocks: off
//!
//! Presets
//!     category_page_grid: 240x300
//!     related_products_list: 152x190 (default)
//! ```
//!
//! ## Roles
//!
//! ```text
//! 001 (none)         -- Select --
//! 002 second_image   Second Gallery Image (Position #2)
//! 003 image          Base Image
//! ```
//!
//! ## Resolve summary (stderr)
//!
//! ```text
//! Resolved 3 of 4 products (1 via fallback)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes the lines. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::RoleOption;
use crate::config::{FlipConfig, Location};
use crate::types::ResolutionResult;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Display form of a role in a chain; empty means no role.
fn role_display(role: &str) -> &str {
    let trimmed = role.trim();
    if trimmed.is_empty() { "(none)" } else { trimmed }
}

// ============================================================================
// Check
// ============================================================================

/// Format the effective configuration of one scope.
pub fn format_config_summary(
    config: &FlipConfig,
    config_dir: &Path,
    store: Option<&str>,
) -> Vec<String> {
    let mut lines = Vec::new();
    let general = &config.general;

    lines.push("Scope".to_string());
    lines.push(format!(
        "{}Config: {}",
        indent(1),
        config_dir.join("config.toml").display()
    ));
    if let Some(code) = store {
        lines.push(format!(
            "{}Store: {} ({})",
            indent(1),
            code,
            config_dir
                .join("stores")
                .join(format!("{code}.toml"))
                .display()
        ));
    }

    lines.push(String::new());
    lines.push("General".to_string());
    lines.push(format!("{}Enabled: {}", indent(1), yes_no(general.enabled)));
    let chain = if general.fallback_role.trim().is_empty() {
        role_display(&general.primary_role).to_string()
    } else {
        format!(
            "{} → {}",
            role_display(&general.primary_role),
            role_display(&general.fallback_role)
        )
    };
    lines.push(format!("{}Roles: {}", indent(1), chain));
    lines.push(format!(
        "{}Animation: {} ({}), {}ms",
        indent(1),
        general.animation_type.label(),
        general.animation_type,
        general.effective_animation_speed()
    ));
    lines.push(format!(
        "{}Desktop only: {}",
        indent(1),
        yes_no(general.desktop_only)
    ));

    lines.push(String::new());
    lines.push("Locations".to_string());
    for location in Location::ALL {
        let state = if config.is_enabled_for(location) {
            "on"
        } else {
            "off"
        };
        lines.push(format!("{}{}: {}", indent(1), location, state));
    }

    lines.push(String::new());
    lines.push("Presets".to_string());
    for (name, preset) in &config.presets {
        let size = match preset.height {
            Some(h) => format!("{}x{}", preset.width, h),
            None => format!("{}w", preset.width),
        };
        let marker = if *name == config.media.default_preset {
            " (default)"
        } else {
            ""
        };
        lines.push(format!("{}{}: {}{}", indent(1), name, size, marker));
    }

    lines
}

pub fn print_config_summary(config: &FlipConfig, config_dir: &Path, store: Option<&str>) {
    for line in format_config_summary(config, config_dir, store) {
        println!("{}", line);
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Format the role selector as an aligned table.
pub fn format_role_options(options: &[RoleOption]) -> Vec<String> {
    let width = options
        .iter()
        .map(|o| role_display(&o.value).len())
        .max()
        .unwrap_or(0);
    options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            format!(
                "{} {:<width$}   {}",
                format_index(i + 1),
                role_display(&option.value),
                option.label,
            )
        })
        .collect()
}

pub fn print_role_options(options: &[RoleOption]) {
    for line in format_role_options(options) {
        println!("{}", line);
    }
}

// ============================================================================
// Resolve
// ============================================================================

/// One-line tally of a resolution run.
pub fn format_resolution_summary(results: &[ResolutionResult]) -> Vec<String> {
    let resolved = results.iter().filter(|r| r.has_image).count();
    let via_fallback = results
        .iter()
        .filter_map(|r| r.resolved_image.as_ref())
        .filter(|image| image.fallback)
        .count();
    let noun = if results.len() == 1 {
        "product"
    } else {
        "products"
    };
    let mut line = format!("Resolved {} of {} {}", resolved, results.len(), noun);
    if via_fallback > 0 {
        line.push_str(&format!(" ({} via fallback)", via_fallback));
    }
    vec![line]
}

/// Writes to stderr so stdout stays valid JSON.
pub fn print_resolution_summary(results: &[ResolutionResult]) {
    for line in format_resolution_summary(results) {
        eprintln!("{}", line);
    }
}

//! Flip-hover configuration module.
//!
//! Handles loading, validating, and merging `config.toml` files. Configuration
//! is layered: stock defaults are overridden by the directory's `config.toml`,
//! which is in turn overridden by a store-scope file when a store code is given.
//!
//! ## Config File Location
//!
//! ```text
//! config/
//! ├── config.toml              # Default scope (overrides stock defaults)
//! └── stores/
//!     ├── default.toml         # Store "default" (overrides config.toml)
//!     └── es_ar.toml           # Store "es_ar"
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [general]
//! enabled = true
//! primary_role = "hover_image"   # attribute code, gallery tag, or "second_image"
//! fallback_role = "second_image" # same choices, or "" for none
//! animation_type = "fade"
//! animation_speed = 300          # milliseconds; zero or negative means 300
//! desktop_only = true
//!
//! [locations]
//! category_page = true
//! widget_products = true
//! search_results = true
//! related_products = true
//! cms_blocks = false
//! page_builder = false
//!
//! [media]
//! base_url = "/media"
//! default_preset = "category_page_list"
//!
//! [presets.category_page_list]
//! width = 240
//! height = 300
//!
//! [processing]
//! max_processes = 4              # batch workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse, override just the values you want:
//!
//! ```toml
//! [general]
//! animation_type = "zoom"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Role name that selects the second enabled gallery image by position.
pub const SECOND_IMAGE: &str = "second_image";

/// Effective animation speed when the configured one is not positive.
pub const DEFAULT_ANIMATION_SPEED_MS: u32 = 300;

const CONFIG_FILENAME: &str = "config.toml";
const STORES_DIR: &str = "stores";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete flip-hover configuration for one scope.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlipConfig {
    /// Feature switch, role chain, and animation settings.
    pub general: GeneralConfig,
    /// Per-location switches.
    pub locations: LocationsConfig,
    /// Media URL settings for the raw-URL fallback.
    pub media: MediaConfig,
    /// Named resize presets, keyed by image id.
    pub presets: BTreeMap<String, PresetConfig>,
    /// Batch resolution settings.
    pub processing: ProcessingConfig,
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            locations: LocationsConfig::default(),
            media: MediaConfig::default(),
            presets: default_presets(),
            processing: ProcessingConfig::default(),
        }
    }
}

fn default_presets() -> BTreeMap<String, PresetConfig> {
    [
        ("category_page_grid", 240, 300),
        ("category_page_list", 240, 300),
        ("new_products_content_widget_grid", 240, 300),
        ("related_products_list", 152, 190),
    ]
    .into_iter()
    .map(|(name, width, height)| {
        (
            name.to_string(),
            PresetConfig {
                width,
                height: Some(height),
            },
        )
    })
    .collect()
}

impl FlipConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, role) in [
            ("general.primary_role", &self.general.primary_role),
            ("general.fallback_role", &self.general.fallback_role),
        ] {
            if role.chars().any(|c| c.is_whitespace() || c == ',') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a single role code, got {role:?}"
                )));
            }
        }
        if self.media.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "media.base_url must not be empty".into(),
            ));
        }
        if !self.presets.contains_key(&self.media.default_preset) {
            return Err(ConfigError::Validation(format!(
                "media.default_preset {:?} is not defined under [presets]",
                self.media.default_preset
            )));
        }
        for (name, preset) in &self.presets {
            if preset.width == 0 || preset.height == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "presets.{name} dimensions must be non-zero"
                )));
            }
        }
        Ok(())
    }

    /// Module switch combined with the switch for `location`.
    pub fn is_enabled_for(&self, location: Location) -> bool {
        self.general.enabled && self.locations.get(location)
    }

    /// Serializable view consumed by the browser-side behavior layer.
    pub fn frontend(&self) -> FrontendConfig {
        FrontendConfig {
            enabled: self.general.enabled,
            primary_role: self.general.primary_role.clone(),
            fallback_role: self.general.fallback_role.clone(),
            animation_type: self.general.animation_type,
            animation_speed_ms: self.general.effective_animation_speed(),
            desktop_only: self.general.desktop_only,
            locations: FrontendLocations {
                category_page: self.is_enabled_for(Location::CategoryPage),
                widget_products: self.is_enabled_for(Location::WidgetProducts),
                search_results: self.is_enabled_for(Location::SearchResults),
                related_products: self.is_enabled_for(Location::RelatedProducts),
                cms_blocks: self.is_enabled_for(Location::CmsBlocks),
                page_builder: self.is_enabled_for(Location::PageBuilder),
            },
        }
    }
}

/// Feature switch, role chain, and animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub enabled: bool,
    /// First role tried. An attribute code, a gallery tag, or `second_image`.
    pub primary_role: String,
    /// Role tried when the primary yields nothing. Empty disables the fallback.
    pub fallback_role: String,
    pub animation_type: AnimationType,
    /// Configured speed in milliseconds. Read through
    /// [`effective_animation_speed`](Self::effective_animation_speed).
    pub animation_speed: i64,
    /// Hint for the client: only flip on pointer devices.
    pub desktop_only: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            primary_role: "hover_image".to_string(),
            fallback_role: SECOND_IMAGE.to_string(),
            animation_type: AnimationType::Fade,
            animation_speed: i64::from(DEFAULT_ANIMATION_SPEED_MS),
            desktop_only: true,
        }
    }
}

impl GeneralConfig {
    /// Positive configured speed, or [`DEFAULT_ANIMATION_SPEED_MS`].
    pub fn effective_animation_speed(&self) -> u32 {
        if self.animation_speed > 0 {
            u32::try_from(self.animation_speed).unwrap_or(u32::MAX)
        } else {
            DEFAULT_ANIMATION_SPEED_MS
        }
    }
}

/// Storefront surfaces where listings can flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    CategoryPage,
    WidgetProducts,
    SearchResults,
    RelatedProducts,
    CmsBlocks,
    PageBuilder,
}

impl Location {
    pub const ALL: [Location; 6] = [
        Location::CategoryPage,
        Location::WidgetProducts,
        Location::SearchResults,
        Location::RelatedProducts,
        Location::CmsBlocks,
        Location::PageBuilder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Location::CategoryPage => "category_page",
            Location::WidgetProducts => "widget_products",
            Location::SearchResults => "search_results",
            Location::RelatedProducts => "related_products",
            Location::CmsBlocks => "cms_blocks",
            Location::PageBuilder => "page_builder",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = String;

    /// Accepts `category_page` and `category-page` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Location::ALL
            .into_iter()
            .find(|l| l.as_str() == normalized)
            .ok_or_else(|| format!("unknown location {s:?}"))
    }
}

/// Per-location switches. Only effective while `general.enabled` is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationsConfig {
    pub category_page: bool,
    pub widget_products: bool,
    pub search_results: bool,
    pub related_products: bool,
    pub cms_blocks: bool,
    pub page_builder: bool,
}

impl Default for LocationsConfig {
    fn default() -> Self {
        Self {
            category_page: true,
            widget_products: true,
            search_results: true,
            related_products: true,
            cms_blocks: false,
            page_builder: false,
        }
    }
}

impl LocationsConfig {
    pub fn get(&self, location: Location) -> bool {
        match location {
            Location::CategoryPage => self.category_page,
            Location::WidgetProducts => self.widget_products,
            Location::SearchResults => self.search_results,
            Location::RelatedProducts => self.related_products,
            Location::CmsBlocks => self.cms_blocks,
            Location::PageBuilder => self.page_builder,
        }
    }
}

/// Transition used when swapping to the secondary image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationType {
    #[default]
    Fade,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    Zoom,
    FlipHorizontal,
    FlipVertical,
}

impl AnimationType {
    pub const ALL: [AnimationType; 8] = [
        AnimationType::Fade,
        AnimationType::SlideLeft,
        AnimationType::SlideRight,
        AnimationType::SlideUp,
        AnimationType::SlideDown,
        AnimationType::Zoom,
        AnimationType::FlipHorizontal,
        AnimationType::FlipVertical,
    ];

    /// Value used in config files, CSS class suffixes, and data attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationType::Fade => "fade",
            AnimationType::SlideLeft => "slide-left",
            AnimationType::SlideRight => "slide-right",
            AnimationType::SlideUp => "slide-up",
            AnimationType::SlideDown => "slide-down",
            AnimationType::Zoom => "zoom",
            AnimationType::FlipHorizontal => "flip-horizontal",
            AnimationType::FlipVertical => "flip-vertical",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnimationType::Fade => "Fade",
            AnimationType::SlideLeft => "Slide Left",
            AnimationType::SlideRight => "Slide Right",
            AnimationType::SlideUp => "Slide Up",
            AnimationType::SlideDown => "Slide Down",
            AnimationType::Zoom => "Zoom",
            AnimationType::FlipHorizontal => "Flip Horizontal",
            AnimationType::FlipVertical => "Flip Vertical",
        }
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media URL settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Base URL of the media directory, without trailing slash.
    pub base_url: String,
    /// Preset used when the caller does not name one.
    pub default_preset: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: "/media".to_string(),
            default_preset: "category_page_list".to_string(),
        }
    }
}

/// Target box of a resize preset. `height` absent keeps the aspect ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresetConfig {
    pub width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Batch resolution settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel resolution workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// JSON shape of the configuration for the browser-side layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendConfig {
    pub enabled: bool,
    pub primary_role: String,
    pub fallback_role: String,
    pub animation_type: AnimationType,
    pub animation_speed_ms: u32,
    pub desktop_only: bool,
    pub locations: FrontendLocations,
}

/// Effective per-location switches (module switch already applied).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendLocations {
    pub category_page: bool,
    pub widget_products: bool,
    pub search_results: bool,
    pub related_products: bool,
    pub cms_blocks: bool,
    pub page_builder: bool,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(FlipConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a TOML file as a raw value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(file: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !file.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(file)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<FlipConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: FlipConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the default-scope config from `config.toml` in `dir`.
pub fn load_config(dir: &Path) -> Result<FlipConfig, ConfigError> {
    load_store_config(dir, None)
}

/// Load the config for a store scope.
///
/// Layers stock defaults, `dir/config.toml`, then `dir/stores/<store>.toml`.
/// Missing files are skipped; a store code that is not a plain identifier is
/// rejected.
pub fn load_store_config(dir: &Path, store: Option<&str>) -> Result<FlipConfig, ConfigError> {
    let mut overlays = Vec::new();
    if let Some(root) = load_raw_config(&dir.join(CONFIG_FILENAME))? {
        overlays.push(root);
    }
    if let Some(code) = store {
        if code.is_empty()
            || !code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Validation(format!(
                "invalid store code {code:?}"
            )));
        }
        let store_file = dir.join(STORES_DIR).join(format!("{code}.toml"));
        if let Some(scoped) = load_raw_config(&store_file)? {
            overlays.push(scoped);
        }
    }
    resolve_config(stock_defaults_value(), overlays)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Flip Hover Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Files are layered:
#   config/config.toml          -> default scope (overrides stock defaults)
#   config/stores/<code>.toml   -> store scope (overrides config.toml)
#
# Each layer only needs the keys it wants to override.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# General
# ---------------------------------------------------------------------------
[general]
# Master switch. When off, no product is ever read for a secondary image.
enabled = true

# Role tried first: an image attribute code (hover_image, small_image, ...),
# a gallery tag, or "second_image" for the second gallery photo by position.
primary_role = "hover_image"

# Role tried when the primary finds nothing. "" disables the fallback.
fallback_role = "second_image"

# fade | slide-left | slide-right | slide-up | slide-down | zoom
# flip-horizontal | flip-vertical
animation_type = "fade"

# Transition duration in milliseconds. Zero or negative means 300.
animation_speed = 300

# Only flip on devices with a fine pointer.
desktop_only = true

# ---------------------------------------------------------------------------
# Locations (only effective while general.enabled is on)
# ---------------------------------------------------------------------------
[locations]
category_page = true
widget_products = true
search_results = true
related_products = true
cms_blocks = false
page_builder = false

# ---------------------------------------------------------------------------
# Media
# ---------------------------------------------------------------------------
[media]
# Base URL of the media directory, used for raw fallback URLs.
base_url = "/media"

# Resize preset used when the caller does not name one.
default_preset = "category_page_list"

# ---------------------------------------------------------------------------
# Resize presets (width required, height optional)
# ---------------------------------------------------------------------------
[presets.category_page_grid]
width = 240
height = 300

[presets.category_page_list]
width = 240
height = 300

[presets.new_products_content_widget_grid]
width = 240
height = 300

[presets.related_products_list]
width = 152
height = 190

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for batch resolution.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = FlipConfig::default();
        assert!(config.general.enabled);
        assert_eq!(config.general.primary_role, "hover_image");
        assert_eq!(config.general.fallback_role, SECOND_IMAGE);
        assert_eq!(config.general.animation_type, AnimationType::Fade);
        assert_eq!(config.media.default_preset, "category_page_list");
        assert!(config.presets.contains_key("category_page_list"));
    }

    #[test]
    fn default_config_passes_validation() {
        FlipConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[general]
animation_type = "zoom"
"#;
        let config: FlipConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.general.animation_type, AnimationType::Zoom);
        // Defaults preserved
        assert_eq!(config.general.primary_role, "hover_image");
        assert!(config.locations.category_page);
    }

    // =========================================================================
    // Animation speed coercion
    // =========================================================================

    #[test]
    fn zero_speed_coerces_to_default() {
        let general = GeneralConfig {
            animation_speed: 0,
            ..Default::default()
        };
        assert_eq!(general.effective_animation_speed(), 300);
    }

    #[test]
    fn negative_speed_coerces_to_default() {
        let general = GeneralConfig {
            animation_speed: -5,
            ..Default::default()
        };
        assert_eq!(general.effective_animation_speed(), 300);
    }

    #[test]
    fn positive_speed_preserved() {
        let general = GeneralConfig {
            animation_speed: 450,
            ..Default::default()
        };
        assert_eq!(general.effective_animation_speed(), 450);
    }

    #[test]
    fn huge_speed_saturates() {
        let general = GeneralConfig {
            animation_speed: i64::MAX,
            ..Default::default()
        };
        assert_eq!(general.effective_animation_speed(), u32::MAX);
    }

    // =========================================================================
    // Locations
    // =========================================================================

    #[test]
    fn location_requires_module_switch() {
        let mut config = FlipConfig::default();
        assert!(config.is_enabled_for(Location::CategoryPage));
        config.general.enabled = false;
        assert!(!config.is_enabled_for(Location::CategoryPage));
    }

    #[test]
    fn location_flag_off() {
        let config = FlipConfig::default();
        assert!(!config.is_enabled_for(Location::CmsBlocks));
        assert!(!config.is_enabled_for(Location::PageBuilder));
    }

    #[test]
    fn location_from_str_accepts_both_spellings() {
        assert_eq!(
            "search-results".parse::<Location>().unwrap(),
            Location::SearchResults
        );
        assert_eq!(
            "cms_blocks".parse::<Location>().unwrap(),
            Location::CmsBlocks
        );
        assert!("checkout".parse::<Location>().is_err());
    }

    // =========================================================================
    // Frontend JSON
    // =========================================================================

    #[test]
    fn frontend_json_field_names() {
        let mut config = FlipConfig::default();
        config.general.animation_speed = -1;
        config.general.animation_type = AnimationType::FlipVertical;
        let json = serde_json::to_value(config.frontend()).unwrap();

        assert_eq!(json["enabled"], true);
        assert_eq!(json["primaryRole"], "hover_image");
        assert_eq!(json["fallbackRole"], "second_image");
        assert_eq!(json["animationType"], "flip-vertical");
        assert_eq!(json["animationSpeedMs"], 300);
        assert_eq!(json["desktopOnly"], true);
        let locations = &json["locations"];
        assert_eq!(locations["categoryPage"], true);
        assert_eq!(locations["widgetProducts"], true);
        assert_eq!(locations["searchResults"], true);
        assert_eq!(locations["relatedProducts"], true);
        assert_eq!(locations["cmsBlocks"], false);
        assert_eq!(locations["pageBuilder"], false);
    }

    #[test]
    fn frontend_locations_off_when_disabled() {
        let mut config = FlipConfig::default();
        config.general.enabled = false;
        let frontend = config.frontend();
        assert!(!frontend.enabled);
        assert!(!frontend.locations.category_page);
        assert!(!frontend.locations.search_results);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_rejects_role_with_whitespace() {
        let mut config = FlipConfig::default();
        config.general.primary_role = "hover image".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_role_list() {
        let mut config = FlipConfig::default();
        config.general.fallback_role = "image,thumbnail".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_accepts_empty_fallback() {
        let mut config = FlipConfig::default();
        config.general.fallback_role = String::new();
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_undefined_default_preset() {
        let mut config = FlipConfig::default();
        config.media.default_preset = "nope".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("nope"));
    }

    #[test]
    fn validate_rejects_zero_preset_dimension() {
        let mut config = FlipConfig::default();
        config.presets.insert(
            "tiny".into(),
            PresetConfig {
                width: 100,
                height: Some(0),
            },
        );
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let mut config = FlipConfig::default();
        config.media.base_url = " ".into();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Unknown key rejection
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<FlipConfig, _> = toml::from_str(
            r#"
[general]
primary_rol = "image"
"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_animation_rejected() {
        let result: Result<FlipConfig, _> = toml::from_str(
            r#"
[general]
animation_type = "spin"
"#,
        );
        assert!(result.is_err());
    }

    // =========================================================================
    // Loading and layering
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, FlipConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[general]
primary_role = "rpx_product_image_on_hover"
animation_speed = 450
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.general.primary_role, "rpx_product_image_on_hover");
        assert_eq!(config.general.effective_animation_speed(), 450);
        assert_eq!(config.general.fallback_role, SECOND_IMAGE);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "not valid toml [[[").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_validates_merged_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[media]
default_preset = "missing"
"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn store_scope_overrides_default_scope() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[general]
animation_type = "zoom"
animation_speed = 500
"#,
        )
        .unwrap();
        fs::create_dir_all(tmp.path().join("stores")).unwrap();
        fs::write(
            tmp.path().join("stores/es_ar.toml"),
            r#"
[general]
animation_type = "slide-left"

[locations]
search_results = false
"#,
        )
        .unwrap();

        let config = load_store_config(tmp.path(), Some("es_ar")).unwrap();
        assert_eq!(config.general.animation_type, AnimationType::SlideLeft);
        // inherited from the default scope
        assert_eq!(config.general.effective_animation_speed(), 500);
        assert!(!config.locations.search_results);

        let default_scope = load_config(tmp.path()).unwrap();
        assert_eq!(default_scope.general.animation_type, AnimationType::Zoom);
        assert!(default_scope.locations.search_results);
    }

    #[test]
    fn missing_store_file_falls_back_to_default_scope() {
        let tmp = TempDir::new().unwrap();
        let config = load_store_config(tmp.path(), Some("fr")).unwrap();
        assert_eq!(config, FlipConfig::default());
    }

    #[test]
    fn store_code_with_path_segments_rejected() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_store_config(tmp.path(), Some("../secrets")),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn store_presets_extend_stock_presets() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[presets.hover_large]
width = 600
"#,
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.presets["hover_large"].height, None);
        assert!(config.presets.contains_key("category_page_list"));
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[general]
enabled = true
animation_speed = 300
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[general]
animation_speed = 700
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let general = merged.get("general").unwrap();
        assert_eq!(general.get("animation_speed").unwrap().as_integer(), Some(700));
        assert_eq!(general.get("enabled").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn merge_toml_scalar_replaces_table() {
        let base: toml::Value = toml::from_str("[a]\nb = 1").unwrap();
        let overlay: toml::Value = toml::from_str("a = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Processing
    // =========================================================================

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: FlipConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(parsed, FlipConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        for section in ["general", "locations", "media", "presets", "processing"] {
            assert!(value.get(section).is_some(), "missing section {section}");
        }
    }
}

//! Settings module.
//!
//! Handles loading, validating, and merging `settings.toml`. Two sections
//! mirror the two halves of the admin settings screen:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [general]
//! enabled_taxonomies = []   # Taxonomies whose terms may carry images
//!
//! [advanced]
//! enabled_devices = []      # Device categories, highest priority first
//! ```
//!
//! ## Ordering is semantic
//!
//! `enabled_devices` is a *list*, not a set: image resolution walks it in
//! stored order and stops at the first category matching the requesting
//! device. `["mobile", "android"]` and `["android", "mobile"]` configure
//! different sites.
//!
//! ## Partial configuration
//!
//! The file is sparse — specify only the values you want:
//!
//! ```toml
//! [advanced]
//! enabled_devices = ["android", "desktop"]
//! ```
//!
//! A missing file means stock defaults (everything off). Unknown keys are
//! rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::device::DeviceCategory;

/// Filename of the settings document inside the data directory.
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// Taxonomy names that can never be enabled: the host CMS's internal and
/// plumbing taxonomies, which have no term-facing UI to show an image on.
pub const RESERVED_TAXONOMIES: &[&str] = &[
    "nav_menu",
    "link_category",
    "post_format",
    "product_visibility",
    "product_shipping_class",
    "action-group",
    "product_type",
    "wp_theme",
    "wp_template_part_area",
];

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Settings validation error: {0}")]
    Validation(String),
}

/// Site settings loaded from `settings.toml`.
///
/// All fields have defaults (empty = feature off). User files need only
/// specify the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Which taxonomies participate; empty disables the feature entirely.
    pub general: GeneralSettings,
    /// Which device categories are served, in fallback-precedence order.
    pub advanced: AdvancedSettings,
}

/// The "General" settings section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralSettings {
    /// Taxonomy names whose terms may carry images. No taxonomy enabled
    /// means every public entry point answers with the enable-first notice.
    pub enabled_taxonomies: Vec<String>,
}

/// The "Advanced" settings section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvancedSettings {
    /// Device categories in resolution order, highest priority first.
    /// Stored order is load-bearing; see the module docs.
    pub enabled_devices: Vec<DeviceCategory>,
}

impl Settings {
    /// Validate settings values beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let devices = &self.advanced.enabled_devices;
        for (i, device) in devices.iter().enumerate() {
            if devices[..i].contains(device) {
                return Err(SettingsError::Validation(format!(
                    "advanced.enabled_devices lists '{device}' more than once"
                )));
            }
        }
        let taxonomies = &self.general.enabled_taxonomies;
        for (i, name) in taxonomies.iter().enumerate() {
            if !is_taxonomy_slug(name) {
                return Err(SettingsError::Validation(format!(
                    "general.enabled_taxonomies entry '{name}' is not a valid taxonomy name"
                )));
            }
            if RESERVED_TAXONOMIES.contains(&name.as_str()) {
                return Err(SettingsError::Validation(format!(
                    "taxonomy '{name}' is reserved and cannot be enabled"
                )));
            }
            if taxonomies[..i].contains(name) {
                return Err(SettingsError::Validation(format!(
                    "general.enabled_taxonomies lists '{name}' more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Taxonomy names are lowercase slugs: letters, digits, `-`, `_`.
fn is_taxonomy_slug(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

// =============================================================================
// Settings loading, merging, and validation
// =============================================================================

/// Returns the stock default settings as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Settings::default()).expect("default settings must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely — in
///   particular, an `enabled_devices` array replaces the whole ordering.
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

/// Load `settings.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_settings(dir: &Path) -> Result<Option<toml::Value>, SettingsError> {
    let path = dir.join(SETTINGS_FILENAME);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_settings(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Settings, SettingsError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: Settings = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from `settings.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_settings(dir: &Path) -> Result<Settings, SettingsError> {
    let base = stock_defaults_value();
    let overlay = load_raw_settings(dir)?;
    resolve_settings(base, overlay)
}

/// Write a raw settings document to `settings.toml` in the given directory.
///
/// Callers validate (via [`resolve_settings`]) before saving, so a file on
/// disk is always loadable.
pub fn save_raw_settings(dir: &Path, doc: &toml::Value) -> Result<(), SettingsError> {
    let content = toml::to_string_pretty(doc)?;
    fs::write(dir.join(SETTINGS_FILENAME), content)?;
    Ok(())
}

// =============================================================================
// Raw option access (`config get`/`set`/`unset`)
// =============================================================================

/// Read one option from a raw settings document, with a caller-supplied
/// default when the section or option is absent. Pure read, no validation.
pub fn get_option(doc: &toml::Value, option: &str, section: &str, default: toml::Value) -> toml::Value {
    doc.get(section)
        .and_then(|s| s.get(option))
        .cloned()
        .unwrap_or(default)
}

/// Set one option in a raw settings document, creating the section table if
/// needed. No-ops if `doc` is not a table (cannot happen for parsed TOML).
pub fn set_option(doc: &mut toml::Value, option: &str, section: &str, value: toml::Value) {
    if let toml::Value::Table(table) = doc {
        let entry = table
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
        if let toml::Value::Table(section_table) = entry {
            section_table.insert(option.to_string(), value);
        }
    }
}

/// Remove one option from a raw settings document. Returns whether the
/// option was present. Emptied sections are left in place.
pub fn unset_option(doc: &mut toml::Value, option: &str, section: &str) -> bool {
    if let toml::Value::Table(table) = doc
        && let Some(toml::Value::Table(section_table)) = table.get_mut(section)
    {
        return section_table.remove(option).is_some();
    }
    false
}

/// Returns a fully-commented stock `settings.toml` with all keys explained.
///
/// Used by the `config gen` CLI command.
pub fn stock_settings_toml() -> &'static str {
    r##"# Taxonomy Image Settings
# =======================
# All settings are optional. Values shown below are the defaults
# (everything off). Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# General
# ---------------------------------------------------------------------------
[general]
# Taxonomies whose terms may carry device images. While this list is
# empty, every public entry point answers with the enable-first notice.
#   enabled_taxonomies = ["category", "post_tag"]
enabled_taxonomies = []

# ---------------------------------------------------------------------------
# Advanced
# ---------------------------------------------------------------------------
[advanced]
# Device categories to serve, highest priority first. Resolution walks
# this list in order and the first category matching the requesting
# device wins. "desktop" matches every requester, so anything listed
# after it is unreachable. Valid entries:
#   android, ios, windowsph, mobile, tablet, desktop
#   enabled_devices = ["android", "ios", "mobile", "desktop"]
enabled_devices = []
"##
}

//! CLI output formatting for every command surface.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (term, device) is its semantic identity — term id or
//! device label — with stored detail shown as indented context lines.
//!
//! # Entity Display Contract
//!
//! Every entity follows the same two-level pattern:
//!
//! 1. **Header line**: identity (+ optional detail like binding count)
//! 2. **Context lines**: indented bindings, availability, usage hints
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Terms
//! Term 3 (2 bindings)
//!     android: http://x/3-android.png
//!     any: http://x/3-any.png
//!     Available: yes
//!     Render: taximg render --term 3 --img-tag
//!     Shortcode: [tax_image term_id="3"]
//! Term 5 (1 binding)
//!     tablet: http://x/5-tablet.png (device not enabled)
//!     Available: no
//!
//! 2 terms, 3 bindings
//! ```
//!
//! ## Check
//!
//! ```text
//! Settings
//!     Taxonomies: category, post_tag
//!     Devices: android, desktop
//! Bindings
//!     Term 5: 'tablet' binding is inactive (device not enabled)
//!     Term 8: legacy 'universal' key in use
//!
//! 2 notes
//! ```
//!
//! # Architecture
//!
//! Each surface has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::device::DeviceCategory;
use crate::resolver::{self, ResolvedImage};
use crate::settings::Settings;
use crate::store::{ImageKey, ImageStore, TermId};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display form of a stored URL: blank values read as `(blank)`.
fn display_url(value: &str) -> &str {
    if value.is_empty() { "(blank)" } else { value }
}

/// Stable listing order for a term's meta keys: `any`, `universal`, the
/// device categories in presentation order, then foreign keys (sorted).
fn ordered_meta_keys(store: &dyn ImageStore, term: TermId) -> Vec<String> {
    let stored = store.meta_keys(term);
    let mut canonical = vec![ImageKey::Any.meta_key(), ImageKey::Universal.meta_key()];
    canonical.extend(DeviceCategory::ALL.map(|cat| ImageKey::Device(cat).meta_key()));

    let mut ordered: Vec<String> = canonical
        .into_iter()
        .filter(|key| stored.contains(key))
        .collect();
    ordered.extend(
        stored
            .into_iter()
            .filter(|key| ImageKey::from_meta_key(key).is_none()),
    );
    ordered
}

/// One binding context line: slug, value, and an optional status marker.
fn binding_line(store: &dyn ImageStore, settings: &Settings, term: TermId, meta_key: &str) -> String {
    let value = store.raw(term, meta_key).unwrap_or_default();
    match ImageKey::from_meta_key(meta_key) {
        Some(ImageKey::Universal) => {
            format!("universal: {} (legacy key)", display_url(&value))
        }
        Some(ImageKey::Device(cat)) if !settings.advanced.enabled_devices.contains(&cat) => {
            format!("{}: {} (device not enabled)", cat.slug(), display_url(&value))
        }
        Some(key) => format!("{}: {}", key.slug(), display_url(&value)),
        None => format!("{}: {} (unrecognized key)", meta_key, display_url(&value)),
    }
}

// ============================================================================
// Term inventory (`list`)
// ============================================================================

/// Format one term's inventory: bindings, availability, usage hints.
pub fn format_term_output(
    store: &dyn ImageStore,
    settings: &Settings,
    term: TermId,
) -> Vec<String> {
    let mut lines = Vec::new();
    let keys = ordered_meta_keys(store, term);
    let noun = if keys.len() == 1 { "binding" } else { "bindings" };
    lines.push(format!("Term {} ({} {})", term, keys.len(), noun));

    for key in &keys {
        lines.push(format!("{}{}", indent(1), binding_line(store, settings, term, key)));
    }

    let available = resolver::image_available(store, settings, term);
    lines.push(format!(
        "{}Available: {}",
        indent(1),
        if available { "yes" } else { "no" }
    ));
    if available {
        lines.push(format!(
            "{}Render: taximg render --term {} --img-tag",
            indent(1),
            term
        ));
        lines.push(format!(
            "{}Shortcode: [tax_image term_id=\"{}\"]",
            indent(1),
            term
        ));
    }
    lines
}

/// Format the full term listing with a trailing summary line.
pub fn format_list_output(store: &dyn ImageStore, settings: &Settings) -> Vec<String> {
    let terms = store.term_ids();
    if terms.is_empty() {
        return vec!["No term images stored.".to_string()];
    }

    let mut lines = vec!["Terms".to_string()];
    let mut total_bindings = 0;
    for term in &terms {
        total_bindings += store.meta_keys(*term).len();
        lines.extend(format_term_output(store, settings, *term));
    }

    lines.push(String::new());
    let term_noun = if terms.len() == 1 { "term" } else { "terms" };
    let binding_noun = if total_bindings == 1 { "binding" } else { "bindings" };
    lines.push(format!(
        "{} {}, {} {}",
        terms.len(),
        term_noun,
        total_bindings,
        binding_noun
    ));
    lines
}

/// Print the term listing to stdout.
pub fn print_list_output(store: &dyn ImageStore, settings: &Settings) {
    for line in format_list_output(store, settings) {
        println!("{}", line);
    }
}

// ============================================================================
// Device catalog (`devices`)
// ============================================================================

/// Format the device catalog: every category with its slug and, when
/// enabled, its position in the fallback order.
pub fn format_devices_output(settings: &Settings) -> Vec<String> {
    let mut lines = vec!["Devices".to_string()];
    for cat in DeviceCategory::ALL {
        lines.push(cat.label().to_string());
        lines.push(format!("{}Slug: {}", indent(1), cat.slug()));
        match settings
            .advanced
            .enabled_devices
            .iter()
            .position(|&enabled| enabled == cat)
        {
            Some(pos) => lines.push(format!("{}Priority: {}", indent(1), pos + 1)),
            None => lines.push(format!("{}(not enabled)", indent(1))),
        }
    }
    lines
}

/// Print the device catalog to stdout.
pub fn print_devices_output(settings: &Settings) {
    for line in format_devices_output(settings) {
        println!("{}", line);
    }
}

// ============================================================================
// Consistency report (`check`)
// ============================================================================

/// Format the consistency report: effective settings plus informational
/// notes about stored bindings. Notes never block anything — inactive
/// bindings are kept on purpose so re-enabling a device restores them.
pub fn format_check_output(store: &dyn ImageStore, settings: &Settings) -> Vec<String> {
    let mut lines = vec!["Settings".to_string()];

    let taxonomies = &settings.general.enabled_taxonomies;
    if taxonomies.is_empty() {
        lines.push(format!("{}Taxonomies: (none - the feature is off)", indent(1)));
    } else {
        lines.push(format!("{}Taxonomies: {}", indent(1), taxonomies.join(", ")));
    }

    let devices = &settings.advanced.enabled_devices;
    if devices.is_empty() {
        lines.push(format!(
            "{}Devices: (none - the any-device image serves every requester)",
            indent(1)
        ));
    } else {
        let slugs: Vec<&str> = devices.iter().map(|cat| cat.slug()).collect();
        lines.push(format!("{}Devices: {}", indent(1), slugs.join(", ")));
    }

    lines.push("Bindings".to_string());
    let mut notes = 0;
    let terms = store.term_ids();
    if terms.is_empty() {
        lines.push(format!("{}(no bindings stored)", indent(1)));
    }
    for term in terms {
        for meta_key in store.meta_keys(term) {
            let note = match ImageKey::from_meta_key(&meta_key) {
                Some(ImageKey::Universal) => {
                    Some(format!("Term {}: legacy 'universal' key in use", term))
                }
                Some(ImageKey::Device(cat)) if !devices.contains(&cat) => Some(format!(
                    "Term {}: '{}' binding is inactive (device not enabled)",
                    term,
                    cat.slug()
                )),
                None => Some(format!("Term {}: unrecognized key '{}'", term, meta_key)),
                Some(_) => None,
            };
            if let Some(note) = note {
                lines.push(format!("{}{}", indent(1), note));
                notes += 1;
            }
        }
    }

    lines.push(String::new());
    if notes == 0 {
        lines.push("No notes.".to_string());
    } else {
        let noun = if notes == 1 { "note" } else { "notes" };
        lines.push(format!("{} {}", notes, noun));
    }
    lines
}

/// Print the consistency report to stdout.
pub fn print_check_output(store: &dyn ImageStore, settings: &Settings) {
    for line in format_check_output(store, settings) {
        println!("{}", line);
    }
}

// ============================================================================
// Resolution outcome (`resolve`)
// ============================================================================

/// Format a resolution outcome: term, requester description, result.
pub fn format_resolve_output(
    term: TermId,
    device_desc: &str,
    resolution: &ResolvedImage,
) -> Vec<String> {
    let result = match resolution {
        ResolvedImage::Found(url) => url.clone(),
        ResolvedImage::Empty => "(no image for this selection)".to_string(),
        ResolvedImage::NoTaxonomies => "(no taxonomies enabled)".to_string(),
    };
    vec![
        format!("Term: {}", term),
        format!("Device: {}", device_desc),
        format!("Image: {}", result),
    ]
}

/// Print a resolution outcome to stdout.
pub fn print_resolve_output(term: TermId, device_desc: &str, resolution: &ResolvedImage) {
    for line in format_resolve_output(term, device_desc, resolution) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

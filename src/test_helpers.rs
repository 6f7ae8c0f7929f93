//! Shared test utilities for the taximg test suite.
//!
//! Provides one-expression builders for the two inputs nearly every test
//! needs — a populated store and a settings value — plus a canonical
//! multi-term fixture for listing and consistency-check tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let store = store_with(&[(5, ImageKey::Any, "http://x/a.png")]);
//! let settings = settings_with(&["category"], &[DeviceCategory::Android]);
//! ```

use crate::device::DeviceCategory;
use crate::settings::Settings;
use crate::store::{ImageKey, ImageStore, MemoryStore, TermId};

// =========================================================================
// Builders
// =========================================================================

/// Build a memory store from `(term, key, url)` triples.
///
/// Goes through [`ImageStore::set`], so values are sanitized exactly as
/// they would be in production.
pub fn store_with(bindings: &[(TermId, ImageKey, &str)]) -> MemoryStore {
    let mut store = MemoryStore::new();
    for (term, key, url) in bindings {
        store.set(*term, *key, url);
    }
    store
}

/// Build settings with the given enabled taxonomies and device order.
pub fn settings_with(taxonomies: &[&str], devices: &[DeviceCategory]) -> Settings {
    let mut settings = Settings::default();
    settings.general.enabled_taxonomies = taxonomies.iter().map(|t| t.to_string()).collect();
    settings.advanced.enabled_devices = devices.to_vec();
    settings
}

// =========================================================================
// Canonical fixture
// =========================================================================

/// A small store exercising the interesting states at once:
///
/// - term 3: android + any bindings (fully configured)
/// - term 5: blank android, non-empty desktop
/// - term 8: legacy universal key only
pub fn demo_store() -> MemoryStore {
    store_with(&[
        (3, ImageKey::Device(DeviceCategory::Android), "http://x/3-android.png"),
        (3, ImageKey::Any, "http://x/3-any.png"),
        (5, ImageKey::Device(DeviceCategory::Android), ""),
        (5, ImageKey::Device(DeviceCategory::Desktop), "http://x/5-desktop.png"),
        (8, ImageKey::Universal, "http://x/8-universal.png"),
    ])
}

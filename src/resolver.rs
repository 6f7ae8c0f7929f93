//! Image resolution: which URL does a term show this requester?
//!
//! The walk, in full:
//!
//! 1. Start from the any-device image (legacy `universal` key first, then
//!    `any`) as the default.
//! 2. If no device categories are enabled, the default decides.
//! 3. Otherwise walk `enabled_devices` in stored order. The **first**
//!    category matching the requesting device selects its binding and the
//!    walk stops there — even when that binding is blank or absent. A
//!    matched category never falls back to the default: the administrator
//!    listed it, so its slot is authoritative for matching devices.
//! 4. `Desktop` matches every requester and therefore terminates the walk
//!    wherever it is listed. If it is not listed and nothing matches, the
//!    default stands.
//!
//! Absence is data, not failure: the outcome is a variant, never an error.

use crate::detect::{AnyDevice, DeviceDetector};
use crate::settings::Settings;
use crate::store::{ImageKey, ImageStore, TermId};

/// Outcome of resolving a term's image for one requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    /// A non-empty URL to display.
    Found(String),
    /// Taxonomies are enabled but the selected slot holds no URL.
    Empty,
    /// No taxonomy is enabled; the feature is off site-wide.
    NoTaxonomies,
}

impl ResolvedImage {
    /// The URL, when one was found.
    pub fn url(&self) -> Option<&str> {
        match self {
            ResolvedImage::Found(url) => Some(url),
            _ => None,
        }
    }
}

/// Resolve the image URL for `term` as seen by `device`.
pub fn resolve(
    store: &dyn ImageStore,
    settings: &Settings,
    term: TermId,
    device: &dyn DeviceDetector,
) -> ResolvedImage {
    if settings.general.enabled_taxonomies.is_empty() {
        return ResolvedImage::NoTaxonomies;
    }

    let mut selected = store.any_device_image(term);
    for &category in &settings.advanced.enabled_devices {
        if category.matches(device) {
            selected = store.get(term, ImageKey::Device(category));
            break;
        }
    }

    match selected {
        Some(url) if !url.is_empty() => ResolvedImage::Found(url),
        _ => ResolvedImage::Empty,
    }
}

/// Device-agnostic availability: does this term have an image to show?
///
/// Runs the same walk as [`resolve`] under the always-matching profile, so
/// it answers for the first *enabled* category (or the any-device default
/// when none are enabled). Drives the admin-side usage hints.
pub fn image_available(store: &dyn ImageStore, settings: &Settings, term: TermId) -> bool {
    matches!(
        resolve(store, settings, term, &AnyDevice),
        ResolvedImage::Found(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::FixedDevice;
    use crate::device::DeviceCategory;
    use crate::store::MemoryStore;
    use crate::test_helpers::{settings_with, store_with};

    const TERM: TermId = 5;

    // =========================================================================
    // Feature gating
    // =========================================================================

    #[test]
    fn no_taxonomies_short_circuits_even_with_bindings() {
        let store = store_with(&[(TERM, ImageKey::Any, "http://x/a.png")]);
        let settings = settings_with(&[], &[DeviceCategory::Desktop]);
        assert_eq!(
            resolve(&store, &settings, TERM, &FixedDevice::default()),
            ResolvedImage::NoTaxonomies
        );
    }

    #[test]
    fn no_bindings_is_empty_never_found() {
        let store = MemoryStore::new();
        let settings = settings_with(&["category"], &[]);
        assert_eq!(
            resolve(&store, &settings, TERM, &FixedDevice::default()),
            ResolvedImage::Empty
        );
    }

    // =========================================================================
    // Any-device default (no devices enabled)
    // =========================================================================

    #[test]
    fn any_binding_serves_every_device_when_no_devices_enabled() {
        let store = store_with(&[(TERM, ImageKey::Any, "http://x/a.png")]);
        let settings = settings_with(&["category"], &[]);
        for device in [
            FixedDevice::default(),
            FixedDevice::from(DeviceCategory::Android),
            FixedDevice::from(DeviceCategory::Tablet),
        ] {
            assert_eq!(
                resolve(&store, &settings, TERM, &device),
                ResolvedImage::Found("http://x/a.png".to_string())
            );
        }
    }

    #[test]
    fn legacy_universal_binding_is_preferred_over_any() {
        let store = store_with(&[
            (TERM, ImageKey::Any, "http://x/any.png"),
            (TERM, ImageKey::Universal, "http://x/universal.png"),
        ]);
        let settings = settings_with(&["category"], &[]);
        assert_eq!(
            resolve(&store, &settings, TERM, &FixedDevice::default()),
            ResolvedImage::Found("http://x/universal.png".to_string())
        );
    }

    // =========================================================================
    // Ordered walk
    // =========================================================================

    #[test]
    fn first_matching_category_wins_over_later_ones() {
        let store = store_with(&[
            (TERM, ImageKey::Device(DeviceCategory::Mobile), "http://x/mobile.png"),
            (TERM, ImageKey::Device(DeviceCategory::Android), "http://x/android.png"),
        ]);
        // A real Android phone answers yes to both queries.
        let phone = FixedDevice {
            android: true,
            mobile: true,
            ..FixedDevice::default()
        };

        let mobile_first = settings_with(
            &["category"],
            &[DeviceCategory::Mobile, DeviceCategory::Android],
        );
        assert_eq!(
            resolve(&store, &mobile_first, TERM, &phone),
            ResolvedImage::Found("http://x/mobile.png".to_string())
        );

        let android_first = settings_with(
            &["category"],
            &[DeviceCategory::Android, DeviceCategory::Mobile],
        );
        assert_eq!(
            resolve(&store, &android_first, TERM, &phone),
            ResolvedImage::Found("http://x/android.png".to_string())
        );
    }

    #[test]
    fn matched_blank_binding_stops_the_walk() {
        let store = store_with(&[
            (TERM, ImageKey::Device(DeviceCategory::Android), ""),
            (TERM, ImageKey::Any, "http://x/default.png"),
        ]);
        let settings = settings_with(
            &["category"],
            &[DeviceCategory::Android, DeviceCategory::Desktop],
        );
        // The android slot is authoritative for android requesters, blank or not.
        assert_eq!(
            resolve(&store, &settings, TERM, &FixedDevice::from(DeviceCategory::Android)),
            ResolvedImage::Empty
        );
    }

    #[test]
    fn matched_absent_binding_also_stops_the_walk() {
        let store = store_with(&[(TERM, ImageKey::Any, "http://x/default.png")]);
        let settings = settings_with(&["category"], &[DeviceCategory::Tablet]);
        assert_eq!(
            resolve(&store, &settings, TERM, &FixedDevice::from(DeviceCategory::Tablet)),
            ResolvedImage::Empty
        );
    }

    #[test]
    fn desktop_terminates_the_walk_wherever_listed() {
        let store = store_with(&[
            (TERM, ImageKey::Device(DeviceCategory::WindowsPhone), "http://x/wp.png"),
            (TERM, ImageKey::Device(DeviceCategory::Desktop), "http://x/desktop.png"),
        ]);
        let windows_phone = FixedDevice::from(DeviceCategory::WindowsPhone);

        let specific_first = settings_with(
            &["category"],
            &[DeviceCategory::WindowsPhone, DeviceCategory::Desktop],
        );
        assert_eq!(
            resolve(&store, &specific_first, TERM, &windows_phone),
            ResolvedImage::Found("http://x/wp.png".to_string())
        );

        // Listed ahead of the specific category, the catch-all shadows it.
        let desktop_first = settings_with(
            &["category"],
            &[DeviceCategory::Desktop, DeviceCategory::WindowsPhone],
        );
        assert_eq!(
            resolve(&store, &desktop_first, TERM, &windows_phone),
            ResolvedImage::Found("http://x/desktop.png".to_string())
        );
    }

    #[test]
    fn unmatched_walk_falls_back_to_the_default() {
        let store = store_with(&[
            (TERM, ImageKey::Device(DeviceCategory::Android), "http://x/android.png"),
            (TERM, ImageKey::Any, "http://x/default.png"),
        ]);
        // Desktop is not listed, so an iPad matches nothing here.
        let settings = settings_with(&["category"], &[DeviceCategory::Android]);
        assert_eq!(
            resolve(&store, &settings, TERM, &FixedDevice::from(DeviceCategory::Tablet)),
            ResolvedImage::Found("http://x/default.png".to_string())
        );
    }

    #[test]
    fn unknown_requester_lands_on_desktop() {
        let store = store_with(&[
            (TERM, ImageKey::Device(DeviceCategory::Desktop), "http://x/desktop.png"),
            (TERM, ImageKey::Device(DeviceCategory::Android), "http://x/android.png"),
        ]);
        let settings = settings_with(
            &["category"],
            &[DeviceCategory::Android, DeviceCategory::Desktop],
        );
        assert_eq!(
            resolve(&store, &settings, TERM, &FixedDevice::default()),
            ResolvedImage::Found("http://x/desktop.png".to_string())
        );
    }

    // =========================================================================
    // image_available
    // =========================================================================

    #[test]
    fn availability_is_false_when_no_taxonomies() {
        let store = store_with(&[(TERM, ImageKey::Any, "http://x/a.png")]);
        let settings = settings_with(&[], &[]);
        assert!(!image_available(&store, &settings, TERM));
    }

    #[test]
    fn availability_uses_the_any_default_when_no_devices_enabled() {
        let store = store_with(&[(TERM, ImageKey::Any, "http://x/a.png")]);
        let settings = settings_with(&["category"], &[]);
        assert!(image_available(&store, &settings, TERM));
        assert!(!image_available(&store, &settings, 99));
    }

    #[test]
    fn availability_follows_the_first_enabled_category() {
        let store = store_with(&[
            (TERM, ImageKey::Device(DeviceCategory::Android), ""),
            (TERM, ImageKey::Device(DeviceCategory::Desktop), "http://x/desktop.png"),
        ]);
        // Same walk as resolve: the first enabled slot decides, blank means no.
        let settings = settings_with(
            &["category"],
            &[DeviceCategory::Android, DeviceCategory::Desktop],
        );
        assert!(!image_available(&store, &settings, TERM));

        let desktop_first = settings_with(
            &["category"],
            &[DeviceCategory::Desktop, DeviceCategory::Android],
        );
        assert!(image_available(&store, &desktop_first, TERM));
    }

    #[test]
    fn resolved_image_url_accessor() {
        assert_eq!(
            ResolvedImage::Found("http://x/a.png".to_string()).url(),
            Some("http://x/a.png")
        );
        assert_eq!(ResolvedImage::Empty.url(), None);
        assert_eq!(ResolvedImage::NoTaxonomies.url(), None);
    }
}

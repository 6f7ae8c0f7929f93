//! Term-form field model: which image inputs a term's create/edit form
//! carries, and how a submission lands in the store.
//!
//! The field list mirrors the admin forms: the any-device input first, then
//! one input per enabled device in settings order; with no devices enabled
//! only the any-device input remains. Edit forms carry current values, and
//! the any-device field pre-fills through the legacy shim so `universal`-era
//! data shows up where administrators expect it.
//!
//! Submissions arrive as a `field name → value` map keyed by meta key
//! (`tax_image_url_<slug>`). Names that do not parse as binding keys are
//! skipped silently; accepted values are sanitized by the store on write.
//! This module renders no HTML — it is the data the host's form layer
//! consumes.

use crate::settings::Settings;
use crate::store::{ImageKey, ImageStore, TermId};

/// One text input on a term form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageField {
    /// The binding slot this field writes.
    pub key: ImageKey,
    /// Submitted form name, e.g. `tax_image_url[tax_image_url_android]`.
    pub name: String,
    pub label: String,
    pub description: String,
    /// Stored value shown on edit forms; `None` on create forms.
    pub current: Option<String>,
}

/// Fields for the term-create form (no current values).
pub fn create_fields(settings: &Settings) -> Vec<ImageField> {
    field_keys(settings)
        .into_iter()
        .map(|key| build_field(key, None))
        .collect()
}

/// Fields for the term-edit form, pre-filled from the store.
pub fn edit_fields(settings: &Settings, store: &dyn ImageStore, term: TermId) -> Vec<ImageField> {
    field_keys(settings)
        .into_iter()
        .map(|key| {
            let current = match key {
                // Legacy shim: universal-era values surface in the any field
                ImageKey::Any => store.any_device_image(term),
                key => store.get(term, key),
            };
            build_field(key, current)
        })
        .collect()
}

/// Store a form submission. Unknown field names no-op silently.
pub fn save_image_urls(store: &mut dyn ImageStore, term: TermId, submitted: &[(String, String)]) {
    for (name, value) in submitted {
        if let Some(key) = ImageKey::from_meta_key(name) {
            store.set(term, key, value);
        }
    }
}

/// The slots a form offers: any-device first, then enabled devices in order.
fn field_keys(settings: &Settings) -> Vec<ImageKey> {
    let mut keys = vec![ImageKey::Any];
    keys.extend(
        settings
            .advanced
            .enabled_devices
            .iter()
            .map(|&cat| ImageKey::Device(cat)),
    );
    keys
}

fn build_field(key: ImageKey, current: Option<String>) -> ImageField {
    let (label, description) = match key {
        ImageKey::Device(cat) => (
            format!("Taxonomy Image For {}", cat.label()),
            format!("Image shown to {} visitors of this term.", cat.label()),
        ),
        _ => (
            "Taxonomy Image For Any Device".to_string(),
            "Fallback image when no device-specific image applies.".to_string(),
        ),
    };
    ImageField {
        key,
        name: format!("tax_image_url[{}]", key.meta_key()),
        label,
        description,
        current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceCategory;
    use crate::store::MemoryStore;
    use crate::test_helpers::{settings_with, store_with};

    // =========================================================================
    // Field lists
    // =========================================================================

    #[test]
    fn no_enabled_devices_leaves_only_the_any_field() {
        let settings = settings_with(&["category"], &[]);
        let fields = create_fields(&settings);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].key, ImageKey::Any);
        assert_eq!(fields[0].name, "tax_image_url[tax_image_url_any]");
        assert_eq!(fields[0].label, "Taxonomy Image For Any Device");
    }

    #[test]
    fn device_fields_follow_settings_order_after_any() {
        let settings = settings_with(
            &["category"],
            &[DeviceCategory::Tablet, DeviceCategory::Android],
        );
        let keys: Vec<ImageKey> = create_fields(&settings).into_iter().map(|f| f.key).collect();
        assert_eq!(
            keys,
            vec![
                ImageKey::Any,
                ImageKey::Device(DeviceCategory::Tablet),
                ImageKey::Device(DeviceCategory::Android),
            ]
        );
    }

    #[test]
    fn create_fields_carry_no_current_values() {
        let settings = settings_with(&["category"], &[DeviceCategory::Android]);
        assert!(create_fields(&settings).iter().all(|f| f.current.is_none()));
    }

    #[test]
    fn edit_fields_prefill_from_the_store() {
        let store = store_with(&[
            (5, ImageKey::Device(DeviceCategory::Android), "http://x/android.png"),
        ]);
        let settings = settings_with(
            &["category"],
            &[DeviceCategory::Android, DeviceCategory::Desktop],
        );
        let fields = edit_fields(&settings, &store, 5);
        let android = fields
            .iter()
            .find(|f| f.key == ImageKey::Device(DeviceCategory::Android))
            .unwrap();
        assert_eq!(android.current.as_deref(), Some("http://x/android.png"));
        let desktop = fields
            .iter()
            .find(|f| f.key == ImageKey::Device(DeviceCategory::Desktop))
            .unwrap();
        assert_eq!(desktop.current, None);
    }

    #[test]
    fn any_field_prefills_through_the_legacy_shim() {
        let store = store_with(&[(5, ImageKey::Universal, "http://x/u.png")]);
        let settings = settings_with(&["category"], &[]);
        let fields = edit_fields(&settings, &store, 5);
        assert_eq!(fields[0].current.as_deref(), Some("http://x/u.png"));
    }

    // =========================================================================
    // Submissions
    // =========================================================================

    #[test]
    fn submission_stores_known_keys_only() {
        let mut store = MemoryStore::new();
        let submitted = vec![
            ("tax_image_url_any".to_string(), "http://x/a.png".to_string()),
            ("tax_image_url_iphone".to_string(), "http://x/ghost.png".to_string()),
            ("_wpnonce".to_string(), "f00".to_string()),
        ];
        save_image_urls(&mut store, 5, &submitted);
        assert_eq!(store.get(5, ImageKey::Any), Some("http://x/a.png".to_string()));
        assert_eq!(store.meta_keys(5), vec!["tax_image_url_any"]);
    }

    #[test]
    fn submission_values_are_sanitized() {
        let mut store = MemoryStore::new();
        let submitted = vec![(
            "tax_image_url_android".to_string(),
            "javascript:alert(1)".to_string(),
        )];
        save_image_urls(&mut store, 5, &submitted);
        assert_eq!(
            store.get(5, ImageKey::Device(DeviceCategory::Android)),
            Some(String::new())
        );
    }

    #[test]
    fn empty_submission_is_a_no_op() {
        let mut store = MemoryStore::new();
        save_image_urls(&mut store, 5, &[]);
        assert!(store.term_ids().is_empty());
    }
}

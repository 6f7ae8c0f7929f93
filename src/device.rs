//! Device category vocabulary.
//!
//! Every image binding and every fallback decision is keyed on one of six
//! device categories. The enum is closed: adding a category means adding a
//! variant, a storage slug, a display label, and a classifier query, all in
//! this file.
//!
//! ## Slugs vs labels
//!
//! Each category has two string forms with different stability guarantees:
//!
//! | Form | Example | Used in | Stability |
//! |------|---------|---------|-----------|
//! | slug | `windowsph` | settings files, meta keys, CLI flags | frozen — historical data depends on it |
//! | label | `Windows Phone` | listings and form-field descriptions | free to improve |
//!
//! The slugs are deliberately the historical ones (including the awkward
//! `windowsph`) so that settings and stored bindings written by earlier
//! versions of the system keep working unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detect::DeviceDetector;

/// Error returned when a string is not a recognized device slug.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown device category '{0}' (expected one of: android, ios, windowsph, mobile, tablet, desktop)")]
pub struct ParseDeviceError(pub String);

/// A class of requesting device, in the granularity the resolver cares about.
///
/// `Desktop` is the implicit catch-all: its classifier query matches every
/// request, so listing it in the enabled-device order terminates the
/// fallback walk for any requester that reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceCategory {
    #[serde(rename = "android")]
    Android,
    #[serde(rename = "ios")]
    Ios,
    #[serde(rename = "windowsph")]
    WindowsPhone,
    #[serde(rename = "mobile")]
    Mobile,
    #[serde(rename = "tablet")]
    Tablet,
    #[serde(rename = "desktop")]
    Desktop,
}

impl DeviceCategory {
    /// All categories, in the order they are presented to administrators.
    pub const ALL: [DeviceCategory; 6] = [
        DeviceCategory::Android,
        DeviceCategory::Ios,
        DeviceCategory::WindowsPhone,
        DeviceCategory::Mobile,
        DeviceCategory::Tablet,
        DeviceCategory::Desktop,
    ];

    /// Stable storage slug. Appears in `settings.toml`, in meta keys
    /// (`tax_image_url_<slug>`), and as the CLI `--device` argument.
    pub fn slug(self) -> &'static str {
        match self {
            DeviceCategory::Android => "android",
            DeviceCategory::Ios => "ios",
            DeviceCategory::WindowsPhone => "windowsph",
            DeviceCategory::Mobile => "mobile",
            DeviceCategory::Tablet => "tablet",
            DeviceCategory::Desktop => "desktop",
        }
    }

    /// Human-readable label for listings and form-field text.
    pub fn label(self) -> &'static str {
        match self {
            DeviceCategory::Android => "Android",
            DeviceCategory::Ios => "iOS (iPhone | iPad | iPod)",
            DeviceCategory::WindowsPhone => "Windows Phone",
            DeviceCategory::Mobile => "Mobile (Any)",
            DeviceCategory::Tablet => "Tablet",
            DeviceCategory::Desktop => "Desktop",
        }
    }

    /// Ask the classifier whether the requesting device falls in this
    /// category. `Desktop` matches unconditionally.
    pub fn matches(self, detector: &dyn DeviceDetector) -> bool {
        match self {
            DeviceCategory::Android => detector.is_android(),
            DeviceCategory::Ios => detector.is_ios(),
            DeviceCategory::WindowsPhone => detector.is_windows_phone(),
            DeviceCategory::Mobile => detector.is_mobile(),
            DeviceCategory::Tablet => detector.is_tablet(),
            DeviceCategory::Desktop => true,
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for DeviceCategory {
    type Err = ParseDeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(DeviceCategory::Android),
            "ios" => Ok(DeviceCategory::Ios),
            "windowsph" => Ok(DeviceCategory::WindowsPhone),
            "mobile" => Ok(DeviceCategory::Mobile),
            "tablet" => Ok(DeviceCategory::Tablet),
            "desktop" => Ok(DeviceCategory::Desktop),
            other => Err(ParseDeviceError(other.to_string())),
        }
    }
}

//! Device classification seam.
//!
//! The resolver never inspects user-agent strings itself. It asks a
//! [`DeviceDetector`] the five category questions and lets
//! [`DeviceCategory::matches`](crate::device::DeviceCategory::matches)
//! dispatch to the right one (Desktop needs no question — it is the
//! catch-all).
//!
//! | Implementation | Answers |
//! |---|---|
//! | [`UserAgentDevice`] | from a parsed user-agent string (woothee) |
//! | [`FixedDevice`] | a forced profile — CLI `--device`, tests |
//! | [`AnyDevice`] | yes to everything — device-agnostic availability walks |

use crate::device::DeviceCategory;

pub mod user_agent;

pub use user_agent::UserAgentDevice;

/// Boolean device-classification queries, one per concrete category.
///
/// Implementations answer for a single request; the queries are independent
/// (a phone is typically both `is_android` and `is_mobile`).
pub trait DeviceDetector {
    fn is_android(&self) -> bool;
    fn is_ios(&self) -> bool;
    fn is_windows_phone(&self) -> bool;
    fn is_mobile(&self) -> bool;
    fn is_tablet(&self) -> bool;
}

/// A detector with fixed answers, independent of any request.
///
/// The default profile answers no to every query: an unclassified requester,
/// which only the Desktop catch-all matches. `From<DeviceCategory>` builds a
/// profile answering yes to exactly that category's query, which is what the
/// CLI's `--device` flag wants — it tests one fallback arm precisely, not a
/// realistic device (real phones answer yes to several queries; use a real
/// user-agent for that).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedDevice {
    pub android: bool,
    pub ios: bool,
    pub windows_phone: bool,
    pub mobile: bool,
    pub tablet: bool,
}

impl From<DeviceCategory> for FixedDevice {
    fn from(category: DeviceCategory) -> Self {
        let mut profile = FixedDevice::default();
        match category {
            DeviceCategory::Android => profile.android = true,
            DeviceCategory::Ios => profile.ios = true,
            DeviceCategory::WindowsPhone => profile.windows_phone = true,
            DeviceCategory::Mobile => profile.mobile = true,
            DeviceCategory::Tablet => profile.tablet = true,
            // Desktop is the absence of every other classification.
            DeviceCategory::Desktop => {}
        }
        profile
    }
}

impl DeviceDetector for FixedDevice {
    fn is_android(&self) -> bool {
        self.android
    }

    fn is_ios(&self) -> bool {
        self.ios
    }

    fn is_windows_phone(&self) -> bool {
        self.windows_phone
    }

    fn is_mobile(&self) -> bool {
        self.mobile
    }

    fn is_tablet(&self) -> bool {
        self.tablet
    }
}

/// A detector that matches every category.
///
/// Availability checks run the resolver walk with no requester to classify;
/// under this profile the first *enabled* category always wins, so the walk
/// degenerates to "look up the highest-priority enabled binding".
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyDevice;

impl DeviceDetector for AnyDevice {
    fn is_android(&self) -> bool {
        true
    }

    fn is_ios(&self) -> bool {
        true
    }

    fn is_windows_phone(&self) -> bool {
        true
    }

    fn is_mobile(&self) -> bool {
        true
    }

    fn is_tablet(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fixed_profile_answers_no_to_everything() {
        let profile = FixedDevice::default();
        assert!(!profile.is_android());
        assert!(!profile.is_ios());
        assert!(!profile.is_windows_phone());
        assert!(!profile.is_mobile());
        assert!(!profile.is_tablet());
    }

    #[test]
    fn fixed_profile_from_category_answers_exactly_that_query() {
        let profile = FixedDevice::from(DeviceCategory::Tablet);
        assert!(profile.is_tablet());
        assert!(!profile.is_mobile());
        assert!(!profile.is_android());
    }

    #[test]
    fn desktop_profile_is_the_default_profile() {
        assert_eq!(
            FixedDevice::from(DeviceCategory::Desktop),
            FixedDevice::default()
        );
    }

    #[test]
    fn any_device_answers_yes_to_everything() {
        for cat in DeviceCategory::ALL {
            assert!(cat.matches(&AnyDevice));
        }
    }
}

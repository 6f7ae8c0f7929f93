//! User-agent-backed device classification.
//!
//! Wraps the `woothee` parser in the [`DeviceDetector`] trait. Only the
//! parsed `category` and `os` fields are consulted:
//!
//! | Query | Condition |
//! |---|---|
//! | `is_android` | os `Android` |
//! | `is_ios` | os `iPhone`, `iPad`, or `iPod` |
//! | `is_windows_phone` | os `Windows Phone OS` |
//! | `is_mobile` | category `smartphone` or `mobilephone` |
//! | `is_tablet` | category `tablet`, or os `iPad` |
//!
//! Tablet detection is best-effort: woothee files the iPad under the
//! `smartphone` category, so `is_tablet` also keys on the os. Android
//! tablets are indistinguishable from Android phones at this level.
//! Anything woothee cannot parse answers no to every query and lands on
//! the Desktop catch-all.

use woothee::parser::Parser;

use super::DeviceDetector;

/// Classification of a single request, parsed once from its user-agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentDevice {
    category: String,
    os: String,
}

impl UserAgentDevice {
    /// Parse a user-agent string into a classification.
    pub fn classify(user_agent: &str) -> Self {
        match Parser::new().parse(user_agent) {
            Some(result) => Self {
                category: result.category.to_string(),
                os: result.os.to_string(),
            },
            None => Self {
                category: String::new(),
                os: String::new(),
            },
        }
    }

    /// Human-readable classification, e.g. `smartphone / Android`.
    pub fn describe(&self) -> String {
        if self.category.is_empty() && self.os.is_empty() {
            "unclassified".to_string()
        } else {
            format!("{} / {}", self.category, self.os)
        }
    }
}

impl DeviceDetector for UserAgentDevice {
    fn is_android(&self) -> bool {
        self.os == "Android"
    }

    fn is_ios(&self) -> bool {
        matches!(self.os.as_str(), "iPhone" | "iPad" | "iPod")
    }

    fn is_windows_phone(&self) -> bool {
        self.os == "Windows Phone OS"
    }

    fn is_mobile(&self) -> bool {
        matches!(self.category.as_str(), "smartphone" | "mobilephone")
    }

    fn is_tablet(&self) -> bool {
        self.category == "tablet" || self.os == "iPad"
    }
}

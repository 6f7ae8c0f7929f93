//! Term image store: keyed persistence for `(term, device) → URL` bindings.
//!
//! # Meta-key scheme
//!
//! Bindings are stored under string meta keys, one per device category plus
//! two pseudo-categories:
//!
//! | Key | Meaning |
//! |---|---|
//! | `tax_image_url_android` … `tax_image_url_desktop` | per-device bindings |
//! | `tax_image_url_any` | device-independent fallback |
//! | `tax_image_url_universal` | deprecated spelling of `any` |
//!
//! The key strings are frozen: data written under the original scheme keeps
//! resolving. In particular the `universal` key is read (and preferred) by
//! [`ImageStore::any_device_image`] even though new writes target `any` —
//! historical installs depend on that precedence.
//!
//! An absent binding (`None`) and a stored empty string (`Some("")`) are
//! different states: the second means an administrator saved the form with
//! the field blank, and resolution treats it as "deliberately nothing".
//!
//! # Sanitization
//!
//! [`sanitize_url`] is the write-side security boundary. Both store
//! implementations pass every value through it, so a `javascript:` payload
//! ends up stored as `""` no matter which entry point accepted it.
//!
//! # Storage
//!
//! [`FileStore`] persists to `term-images.json`, a versioned, pretty-printed
//! JSON document. Unlike a disposable cache, this file is authoritative
//! data: unreadable content or an unknown format version is an error, never
//! silently replaced with an empty store.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::device::DeviceCategory;

/// Name of the bindings file within the data directory.
pub const BINDINGS_FILENAME: &str = "term-images.json";

/// Version of the bindings file format. Bump when the layout changes;
/// loading an unknown version is an error, not a reset.
const BINDINGS_VERSION: u32 = 1;

/// Prefix shared by every binding meta key.
pub const META_KEY_PREFIX: &str = "tax_image_url_";

/// Host-CMS term identifier. Always positive; `0` is "no term".
pub type TermId = u32;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported bindings file version {found} (this build reads version {expected})")]
    Version { found: u32, expected: u32 },
}

/// Error returned when a string names neither a device slug nor a
/// pseudo-category.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown image key '{0}' (expected a device slug, 'any', or 'universal')")]
pub struct ParseImageKeyError(pub String);

/// Addresses one binding slot of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKey {
    /// The device-independent fallback slot.
    Any,
    /// Deprecated spelling of [`ImageKey::Any`]; read-preferred for
    /// compatibility, never offered on forms.
    Universal,
    /// A per-device slot.
    Device(DeviceCategory),
}

impl ImageKey {
    /// Slug as it appears in meta keys and on the CLI.
    pub fn slug(self) -> &'static str {
        match self {
            ImageKey::Any => "any",
            ImageKey::Universal => "universal",
            ImageKey::Device(cat) => cat.slug(),
        }
    }

    /// Full meta key, e.g. `tax_image_url_windowsph`.
    pub fn meta_key(self) -> String {
        format!("{META_KEY_PREFIX}{}", self.slug())
    }

    /// Parse a full meta key back into a typed key. Returns `None` for
    /// foreign keys (wrong prefix or unknown slug).
    pub fn from_meta_key(meta_key: &str) -> Option<ImageKey> {
        let slug = meta_key.strip_prefix(META_KEY_PREFIX)?;
        slug.parse().ok()
    }
}

impl FromStr for ImageKey {
    type Err = ParseImageKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(ImageKey::Any),
            "universal" => Ok(ImageKey::Universal),
            other => other
                .parse::<DeviceCategory>()
                .map(ImageKey::Device)
                .map_err(|_| ParseImageKeyError(other.to_string())),
        }
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Reduce an untrusted URL to something safe to echo into markup.
///
/// Accepted shapes, returned verbatim (minus surrounding whitespace):
/// - absolute `http://` / `https://` URLs
/// - protocol-relative references (`//cdn.example.com/img.png`)
/// - site-relative references (`/uploads/img.png`)
///
/// Everything else — other schemes (`javascript:`, `data:`, `ftp:`),
/// relative paths without a leading slash, unparseable strings — becomes
/// the empty string, which downstream code already treats as "no image".
pub fn sanitize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match Url::parse(trimmed) {
        Ok(parsed) => {
            if matches!(parsed.scheme(), "http" | "https") {
                trimmed.to_string()
            } else {
                String::new()
            }
        }
        // No scheme: only rooted references pass ("//host/…" included).
        Err(url::ParseError::RelativeUrlWithoutBase) if trimmed.starts_with('/') => {
            trimmed.to_string()
        }
        Err(_) => String::new(),
    }
}

/// The keyed store every resolution and form path goes through.
///
/// Implementations hold raw meta-key maps per term; the typed [`ImageKey`]
/// layer keeps callers away from key-string spelling. Embedders with their
/// own term-meta table implement this trait to plug the resolver in.
pub trait ImageStore {
    /// Raw read by meta key. Reaches foreign keys a typed [`ImageKey`]
    /// cannot express; listings and consistency checks need those.
    fn raw(&self, term: TermId, meta_key: &str) -> Option<String>;

    /// Upsert a binding. The stored value is `sanitize_url(url)`;
    /// last write wins.
    fn set(&mut self, term: TermId, key: ImageKey, url: &str);

    /// All terms with at least one binding, ascending.
    fn term_ids(&self) -> Vec<TermId>;

    /// Raw meta keys stored for a term, sorted.
    fn meta_keys(&self, term: TermId) -> Vec<String>;

    /// Stored URL for a binding. `None` means never configured; `Some("")`
    /// means configured blank.
    fn get(&self, term: TermId, key: ImageKey) -> Option<String> {
        self.raw(term, &key.meta_key())
    }

    /// The any-device image, honoring the legacy key order: a non-empty
    /// `universal` value wins, otherwise whatever `any` holds.
    fn any_device_image(&self, term: TermId) -> Option<String> {
        self.get(term, ImageKey::Universal)
            .filter(|url| !url.is_empty())
            .or_else(|| self.get(term, ImageKey::Any))
    }
}

/// In-memory store: the reference implementation, used by tests and by
/// embedders that manage persistence themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    terms: BTreeMap<TermId, BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageStore for MemoryStore {
    fn raw(&self, term: TermId, meta_key: &str) -> Option<String> {
        self.terms.get(&term)?.get(meta_key).cloned()
    }

    fn set(&mut self, term: TermId, key: ImageKey, url: &str) {
        self.terms
            .entry(term)
            .or_default()
            .insert(key.meta_key(), sanitize_url(url));
    }

    fn term_ids(&self) -> Vec<TermId> {
        self.terms.keys().copied().collect()
    }

    fn meta_keys(&self, term: TermId) -> Vec<String> {
        self.terms
            .get(&term)
            .map(|bindings| bindings.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// On-disk store backed by `term-images.json`.
///
/// The document maps term id → meta key → URL:
///
/// ```json
/// {
///   "version": 1,
///   "terms": {
///     "5": {
///       "tax_image_url_android": "https://cdn.example.com/android.png",
///       "tax_image_url_any": "https://cdn.example.com/default.png"
///     }
///   }
/// }
/// ```
///
/// `BTreeMap`s keep the serialized form stable, so the file diffs cleanly
/// under version control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStore {
    version: u32,
    terms: BTreeMap<TermId, BTreeMap<String, String>>,
}

impl FileStore {
    /// Create an empty store (first run).
    pub fn empty() -> Self {
        Self {
            version: BINDINGS_VERSION,
            terms: BTreeMap::new(),
        }
    }

    /// Load from the data directory. A missing file is an empty store;
    /// anything else that cannot be read back is an error.
    pub fn load(dir: &Path) -> Result<Self, StoreError> {
        let path = dir.join(BINDINGS_FILENAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::empty());
            }
            Err(err) => return Err(err.into()),
        };
        let store: Self = serde_json::from_str(&content)?;
        if store.version != BINDINGS_VERSION {
            return Err(StoreError::Version {
                found: store.version,
                expected: BINDINGS_VERSION,
            });
        }
        Ok(store)
    }

    /// Save to the data directory.
    pub fn save(&self, dir: &Path) -> Result<(), StoreError> {
        let path = dir.join(BINDINGS_FILENAME);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl ImageStore for FileStore {
    fn raw(&self, term: TermId, meta_key: &str) -> Option<String> {
        self.terms.get(&term)?.get(meta_key).cloned()
    }

    fn set(&mut self, term: TermId, key: ImageKey, url: &str) {
        self.terms
            .entry(term)
            .or_default()
            .insert(key.meta_key(), sanitize_url(url));
    }

    fn term_ids(&self) -> Vec<TermId> {
        self.terms.keys().copied().collect()
    }

    fn meta_keys(&self, term: TermId) -> Vec<String> {
        self.terms
            .get(&term)
            .map(|bindings| bindings.keys().cloned().collect())
            .unwrap_or_default()
    }
}

//! # Taximg
//!
//! Device-aware images for taxonomy terms. Each term (a category, tag, or
//! custom grouping of content) can carry one image per device class, and
//! the right image is resolved per requester: Android phones get the
//! android image, tablets the tablet image, everyone else the any-device
//! default.
//!
//! # Architecture: Default, Then Walk
//!
//! Resolution is a two-step selection over a term's stored bindings:
//!
//! ```text
//! 1. Default   start from the any-device image (legacy universal first)
//! 2. Walk      enabled device categories, in configured priority order
//! 3. Decide    first category matching the requester is final — its
//!              binding replaces the default, even when blank
//! ```
//!
//! The walk never resumes after a match. An enabled category owns its
//! requesters: if the android slot is blank, android visitors get no
//! image rather than someone else's. Administrators see exactly the
//! fallback order they configured, nothing resolves "surprisingly".
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`device`] | The six device categories: slugs, labels, match dispatch |
//! | [`detect`] | Requester classification: user-agent parsing, fixed and permissive profiles |
//! | [`settings`] | `settings.toml` loading, validation, overlay merging, option editing |
//! | [`store`] | Term-to-image bindings: meta-key scheme, sanitization, JSON persistence |
//! | [`resolver`] | The fallback walk — turns store + settings + device into one image |
//! | [`render`] | HTML `<img>` markup and the user-facing notice strings |
//! | [`shortcode`] | `[tax_image]` attribute parsing with permissive coercions |
//! | [`form`] | Per-device URL field descriptors for term create/edit screens |
//! | [`output`] | CLI output formatting for listings, checks, and resolutions |
//!
//! # Design Decisions
//!
//! ## First Match Is Final
//!
//! A matching enabled category terminates resolution even when its binding
//! is blank or absent. The alternative (fall back to the default on blank)
//! makes a blank slot indistinguishable from an unconfigured device, and
//! administrators lose the ability to deliberately serve no image to one
//! class of device. Blank means blank. See [`resolver::resolve`].
//!
//! ## Maud Over String Templates
//!
//! Markup comes from [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed markup is a build error, interpolated values are
//! auto-escaped, and there are no template files to ship. A stored URL that
//! somehow contains `"` cannot break out of its attribute.
//!
//! ## Sanitize at Write Time
//!
//! URLs are validated when stored, not when served ([`store::sanitize_url`]).
//! Absolute `http`/`https` URLs, protocol-relative `//host/...`, and
//! root-relative `/path` forms pass; everything else is stored as the empty
//! string. Reads stay cheap and every consumer (resolver, render,
//! shortcode) sees the same already-clean value.
//!
//! ## Frozen Storage Keys
//!
//! Bindings persist under `tax_image_url_<slug>` meta keys with slugs that
//! never change (`windowsph`, not `windows_phone`), plus the legacy
//! `universal` key older data used for the any-device image. Renaming a
//! slug would orphan existing data, so display names live in
//! [`device::DeviceCategory::label`] and the stored slugs stay as they are.

pub mod detect;
pub mod device;
pub mod form;
pub mod output;
pub mod render;
pub mod resolver;
pub mod settings;
pub mod shortcode;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;

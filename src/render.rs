//! Presentation adapter: template-function output for resolved images.
//!
//! [`taxonomy_image`] is the public face of the resolver. It flattens the
//! tri-state resolution into what a page actually shows: the raw URL, an
//! `<img>` element, or one of two notices. The notices stay distinguishable
//! in [`TaxonomyImage`] — callers that need to know *why* nothing rendered
//! match on the variant instead of comparing strings.
//!
//! Markup goes through maud, so attribute values are escaped automatically;
//! a stored URL can never break out of its `src` attribute.

use maud::html;

use crate::detect::DeviceDetector;
use crate::resolver::{self, ResolvedImage};
use crate::settings::Settings;
use crate::store::{ImageStore, TermId};

/// Notice shown when resolution found no URL for the selected slot.
pub const UPLOAD_IMAGE_NOTICE: &str = "Please Upload Image First!";

/// Notice shown while no taxonomy is enabled in settings.
pub const ENABLE_TAXONOMIES_NOTICE: &str = "Please Enable Taxonomies First!";

/// What the template function produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyImage {
    /// The display string: a raw URL, or a full `<img>` element when the
    /// caller asked for a tag.
    Rendered(String),
    /// Resolution yielded no URL; displays as [`UPLOAD_IMAGE_NOTICE`].
    NoImage,
    /// The feature is off; displays as [`ENABLE_TAXONOMIES_NOTICE`].
    NoTaxonomies,
}

impl std::fmt::Display for TaxonomyImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxonomyImage::Rendered(s) => f.write_str(s),
            TaxonomyImage::NoImage => f.write_str(UPLOAD_IMAGE_NOTICE),
            TaxonomyImage::NoTaxonomies => f.write_str(ENABLE_TAXONOMIES_NOTICE),
        }
    }
}

/// The template function: resolve `term` for `device` and format the result.
///
/// With `img_tag` false the rendered form is the bare URL; with it true, an
/// `<img>` element carrying `src` and the space-joined `class` list (the
/// class attribute is present even when the list is empty).
pub fn taxonomy_image(
    store: &dyn ImageStore,
    settings: &Settings,
    device: &dyn DeviceDetector,
    term: TermId,
    img_tag: bool,
    classes: &[String],
) -> TaxonomyImage {
    match resolver::resolve(store, settings, term, device) {
        ResolvedImage::Found(url) => {
            if img_tag {
                TaxonomyImage::Rendered(image_markup(&url, classes))
            } else {
                TaxonomyImage::Rendered(url)
            }
        }
        ResolvedImage::Empty => TaxonomyImage::NoImage,
        ResolvedImage::NoTaxonomies => TaxonomyImage::NoTaxonomies,
    }
}

/// Build the `<img>` element for a resolved URL.
fn image_markup(url: &str, classes: &[String]) -> String {
    let class_attr = classes.join(" ");
    html! { img src=(url) class=(class_attr); }.into_string()
}

//! Shortcode entry point: `[tax_image term_id="5" return_img_tag="true" class="a b"]`.
//!
//! Attribute handling keeps the permissive coercions page authors rely on:
//!
//! - `term_id` takes its leading integer — `"5"` and `"5abc"` mean term 5,
//!   anything without a usable positive integer means "use the current term"
//! - `return_img_tag` accepts the usual truthy spellings (`1`, `true`,
//!   `yes`, `on`, any case); everything else is false
//! - `class` splits on whitespace into a class list
//!
//! Values may be double-quoted, single-quoted, or bare; unknown attributes
//! are ignored. [`ShortcodeAttrs::parse`] accepts either the bare attribute
//! string or the full bracketed shortcode text.

use crate::detect::DeviceDetector;
use crate::render::taxonomy_image;
use crate::settings::Settings;
use crate::store::{ImageStore, TermId};

/// Registered shortcode name.
pub const SHORTCODE_NAME: &str = "tax_image";

/// Typed view of the shortcode's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortcodeAttrs {
    /// Explicit target term; `None` defers to the page's current term.
    pub term_id: Option<TermId>,
    /// Render an `<img>` element instead of the bare URL.
    pub return_img_tag: bool,
    /// Class list for the `<img>` element.
    pub classes: Vec<String>,
}

impl ShortcodeAttrs {
    /// Parse attributes from shortcode text, applying the coercions
    /// described in the module docs.
    pub fn parse(input: &str) -> Self {
        let mut parsed = ShortcodeAttrs::default();
        for (key, value) in parse_attrs(attr_body(input)) {
            match key.as_str() {
                "term_id" => parsed.term_id = coerce_term_id(&value),
                "return_img_tag" => parsed.return_img_tag = coerce_bool(&value),
                "class" => {
                    parsed.classes = value.split_whitespace().map(str::to_string).collect();
                }
                // Unknown attributes are ignored
                _ => {}
            }
        }
        parsed
    }
}

/// Render the shortcode: parse attributes, fall back to the ambient term
/// when the attributes carry none, and run the template function.
pub fn tax_image_shortcode(
    store: &dyn ImageStore,
    settings: &Settings,
    device: &dyn DeviceDetector,
    input: &str,
    current_term: Option<TermId>,
) -> String {
    let attrs = ShortcodeAttrs::parse(input);
    // Term 0 never has bindings, so "no term anywhere" resolves to the
    // upload notice rather than an error.
    let term = attrs.term_id.or(current_term).unwrap_or(0);
    taxonomy_image(
        store,
        settings,
        device,
        term,
        attrs.return_img_tag,
        &attrs.classes,
    )
    .to_string()
}

/// Strip the optional `[tax_image …]` wrapper, leaving the attribute body.
fn attr_body(input: &str) -> &str {
    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed)
        .trim();
    inner
        .strip_prefix(SHORTCODE_NAME)
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        .map(str::trim_start)
        .unwrap_or(inner)
}

/// Scan `key=value` pairs. Values may be `"quoted"`, `'quoted'`, or bare
/// (ending at whitespace); an unterminated quote runs to the end of input.
/// Bare tokens without `=` are skipped.
fn parse_attrs(input: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut rest = input.trim_start();
    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = &rest[key_end..];

        if let Some(after_eq) = rest.strip_prefix('=') {
            let (value, after) = scan_value(after_eq);
            if !key.is_empty() {
                attrs.push((key.to_ascii_lowercase(), value.to_string()));
            }
            rest = after.trim_start();
        } else {
            rest = rest.trim_start();
        }
    }
    attrs
}

fn scan_value(input: &str) -> (&str, &str) {
    for quote in ['"', '\''] {
        if let Some(quoted) = input.strip_prefix(quote) {
            return match quoted.find(quote) {
                Some(end) => (&quoted[..end], &quoted[end + 1..]),
                None => (quoted, ""),
            };
        }
    }
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    (&input[..end], &input[end..])
}

/// Leading-integer coercion. Out-of-range and non-positive ids behave as
/// unset, since term ids are positive.
fn coerce_term_id(value: &str) -> Option<TermId> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<TermId>() {
        Ok(0) | Err(_) => None,
        Ok(term) => Some(term),
    }
}

/// The truthy spellings: `1`, `true`, `on`, `yes` (case-insensitive).
fn coerce_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

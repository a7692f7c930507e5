//! Stylesheet link extraction
//!
//! Parses raw HTML (well-formed or not) into a DOM and collects the `href` of
//! every `<link>` element that points at a `.css` file, in document order.

mod reference;

pub use reference::StylesheetReference;

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

lazy_static! {
    // These patterns are hardcoded and syntactically valid.
    // If they fail to parse, it indicates a compile-time bug in the pattern strings.
    static ref LINK_SELECTOR: Selector =
        Selector::parse("link[href]")
            .expect("BUG: hardcoded CSS selector 'link[href]' is invalid - this is a compile-time bug");

    static ref CSS_HREF: Regex =
        Regex::new(r"(?i)\.css(?:[?#].*)?$")
            .expect("BUG: hardcoded stylesheet href pattern is invalid - this is a compile-time bug");
}

/// Whether an `href` value names a `.css` file, optionally followed by a
/// query string or fragment
#[inline]
#[must_use]
pub fn is_stylesheet_href(href: &str) -> bool {
    CSS_HREF.is_match(href)
}

/// Extract stylesheet references from raw HTML
///
/// Returns references in the order they appear in the document. Duplicates are
/// kept and nothing is validated beyond the `.css` suffix check.
#[must_use]
pub fn extract_stylesheet_references(html: &str) -> Vec<StylesheetReference> {
    let document = Html::parse_document(html);

    let references: Vec<StylesheetReference> = document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_stylesheet_href(href))
        .map(StylesheetReference::new)
        .collect();

    log::debug!("Extracted {} stylesheet reference(s)", references.len());
    references
}

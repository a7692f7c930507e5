//! Stylesheet reference type

use crate::utils::{css_base_name, is_remote_reference, strip_query};

/// A stylesheet `href` exactly as it appears in the HTML document
///
/// The full value (query string included) is what gets resolved and fetched;
/// [`StylesheetReference::base_name`] is what outputs are named after.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StylesheetReference {
    href: String,
}

impl StylesheetReference {
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    /// Full reference including any query string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.href
    }

    /// `http://`, `https://` or protocol-relative reference
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        is_remote_reference(&self.href)
    }

    /// Reference with query string and fragment removed
    #[inline]
    #[must_use]
    pub fn without_query(&self) -> &str {
        strip_query(&self.href)
    }

    /// File name without directory, query string or `.css` extension
    #[must_use]
    pub fn base_name(&self) -> String {
        css_base_name(&self.href)
    }
}

impl std::fmt::Display for StylesheetReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.href)
    }
}

impl AsRef<str> for StylesheetReference {
    fn as_ref(&self) -> &str {
        &self.href
    }
}

//! URL and path manipulation utilities.
//!
//! This module provides functions for classifying stylesheet references and
//! mapping remote URLs onto the local domain mirror layout.

use std::path::{Path, PathBuf};
use url::Url;

use crate::error::GeneratorError;

use super::constants::{FALLBACK_STYLESHEET_NAME, STYLESHEET_DIR_NAME};

/// Check whether a reference points at a remote resource
///
/// Protocol-relative references (`//cdn.example.com/a.css`) count as remote.
#[must_use]
pub fn is_remote_reference(reference: &str) -> bool {
    let lower = reference.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

/// Strip the query string and fragment from a reference
#[inline]
#[must_use]
pub fn strip_query(reference: &str) -> &str {
    match reference.find(['?', '#']) {
        Some(idx) => &reference[..idx],
        None => reference,
    }
}

/// Base name of a stylesheet reference or path, without directory,
/// query string or extension.
///
/// `https://host/path/file.css?v=2` becomes `file`, `./main.min.css` becomes `main.min`.
#[must_use]
pub fn css_base_name(reference: &str) -> String {
    let without_query = strip_query(reference);
    let file_name = without_query
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_query);

    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// Parse user input into a fetchable http(s) URL
///
/// Input without a scheme is treated as `https://`.
pub fn parse_remote_url(input: &str) -> Result<Url, GeneratorError> {
    let trimmed = input.trim();
    let candidate = if trimmed.starts_with("//") {
        format!("https:{trimmed}")
    } else if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|e| GeneratorError::Fetch {
        url: input.to_string(),
        message: format!("Invalid URL: {e}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(GeneratorError::Fetch {
            url: input.to_string(),
            message: format!("Unsupported scheme '{}'", url.scheme()),
        });
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(GeneratorError::Fetch {
            url: input.to_string(),
            message: "Invalid URL: no host".to_string(),
        });
    }

    Ok(url)
}

fn domain_dir(url: &Url, domain_root: &Path) -> Result<PathBuf, GeneratorError> {
    let host = url.host_str().ok_or_else(|| GeneratorError::Fetch {
        url: url.to_string(),
        message: "Invalid URL: no host".to_string(),
    })?;

    Ok(domain_root.join(sanitize_filename::sanitize(host)))
}

/// Local path a fetched HTML page is stored under: `<root>/<host>/<file_name>`
pub fn page_mirror_path(
    url: &Url,
    domain_root: &Path,
    file_name: &str,
) -> Result<PathBuf, GeneratorError> {
    Ok(domain_dir(url, domain_root)?.join(file_name))
}

/// Local path a fetched stylesheet is stored under: `<root>/<host>/css/<last segment>`
pub fn stylesheet_mirror_path(url: &Url, domain_root: &Path) -> Result<PathBuf, GeneratorError> {
    let file_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(sanitize_filename::sanitize)
        .filter(|segment| !segment.is_empty())
        .unwrap_or_else(|| FALLBACK_STYLESHEET_NAME.to_string());

    Ok(domain_dir(url, domain_root)?
        .join(STYLESHEET_DIR_NAME)
        .join(file_name))
}

/// `dir/style.css` with `n = 2` becomes `dir/style-2.css`
#[must_use]
pub fn numbered_path(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}-{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{n}"),
    };
    path.with_file_name(file_name)
}

//! HTTP download with streaming size limits
//!
//! Both HTML pages and stylesheets go through [`download_core`]; they only
//! differ in `Accept` header and size limit, see [`ResourceKind`].

use futures::StreamExt;
use reqwest::Client;

use crate::error::{GeneratorError, Result};

/// Kind of remote resource being fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Page,
    Stylesheet,
}

impl ResourceKind {
    #[must_use]
    pub fn accept_header(self) -> &'static str {
        match self {
            ResourceKind::Page => {
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
            }
            ResourceKind::Stylesheet => "text/css,*/*;q=0.1",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Page => write!(f, "HTML page"),
            ResourceKind::Stylesheet => write!(f, "CSS"),
        }
    }
}

/// Core download implementation
///
/// Handles HTTP GET with streaming and a hard size limit. The body is
/// returned byte-for-byte; no decoding is applied beyond transport encoding.
pub(crate) async fn download_core(
    client: &Client,
    url: &str,
    kind: ResourceKind,
    max_size: usize,
) -> Result<Vec<u8>> {
    let fetch_error = |message: String| GeneratorError::Fetch {
        url: url.to_string(),
        message,
    };

    let response = client
        .get(url)
        .header("Accept", kind.accept_header())
        .send()
        .await
        .map_err(|e| fetch_error(format!("{kind} request failed: {e}")))?;

    // Check status
    if !response.status().is_success() {
        return Err(fetch_error(format!(
            "{kind} download failed with status: {}",
            response.status()
        )));
    }

    // Get expected size and enforce limit BEFORE downloading
    let expected_size = response.content_length().unwrap_or(0);
    if expected_size > max_size as u64 {
        return Err(fetch_error(format!(
            "{kind} too large: {expected_size} bytes exceeds limit of {max_size} bytes"
        )));
    }

    let mut buffer = if expected_size > 0 {
        Vec::with_capacity(expected_size as usize)
    } else {
        Vec::new()
    };

    // Stream response with size checking, Content-Length may be absent or wrong
    let mut stream = response.bytes_stream();
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| fetch_error(format!("Failed to read {kind}: {e}")))?;

        let new_total = buffer.len() + chunk.len();
        if new_total > max_size {
            return Err(fetch_error(format!(
                "{kind} exceeded size limit during download: {new_total} bytes (max: {max_size})"
            )));
        }

        buffer.extend_from_slice(&chunk);
    }

    log::debug!("Downloaded {} bytes of {kind} from {url}", buffer.len());
    Ok(buffer)
}

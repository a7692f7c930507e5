//! Stylesheet reference resolution
//!
//! Turns each [`StylesheetReference`] of an HTML document into a readable
//! local file:
//!
//! - absolute `http(s)://` and protocol-relative references are fetched into
//!   the domain mirror through the [`ResourceMaterializer`];
//! - relative references of a document that was itself fetched from a domain
//!   are resolved against the page URL and fetched the same way;
//! - everything else is joined onto the HTML file's directory, after dropping
//!   a leading `./` and any query string, and checked for readability.
//!
//! A failed reference is reported and skipped; it never aborts the others and
//! never falls back to a different file.

pub mod types;

pub use types::{ResolutionFailure, ResolutionReport, ResolvedResource, ResourceOrigin};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use url::Url;

use crate::link_extractor::StylesheetReference;
use crate::materializer::ResourceMaterializer;
use crate::utils::{numbered_path, stylesheet_mirror_path};

/// Resolves stylesheet references of one HTML document
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    materializer: &'a ResourceMaterializer,
}

impl<'a> PathResolver<'a> {
    #[must_use]
    pub fn new(materializer: &'a ResourceMaterializer) -> Self {
        Self { materializer }
    }

    /// Resolve a single reference
    ///
    /// `html_path` is the local HTML file; `page_url` is set when that file was
    /// materialized from a remote page.
    pub async fn resolve(
        &self,
        reference: &StylesheetReference,
        html_path: &Path,
        page_url: Option<&Url>,
    ) -> Result<ResolvedResource, ResolutionFailure> {
        self.resolve_claiming(reference, html_path, page_url, &mut HashMap::new())
            .await
    }

    /// Resolve every reference in order, collecting successes and failures
    ///
    /// Remote stylesheets sharing a file name are stored side by side
    /// (`style.css`, `style-2.css`) so each resolved path keeps its own bytes.
    pub async fn resolve_all(
        &self,
        references: &[StylesheetReference],
        html_path: &Path,
        page_url: Option<&Url>,
    ) -> ResolutionReport {
        let mut report = ResolutionReport::default();
        let mut claimed = HashMap::new();

        // Sequential: results are presented in document order
        for reference in references {
            match self
                .resolve_claiming(reference, html_path, page_url, &mut claimed)
                .await
            {
                Ok(resolved) => report.resolved.push(resolved),
                Err(failure) => {
                    log::debug!("{failure}");
                    report.failures.push(failure);
                }
            }
        }

        log::debug!(
            "Resolved {}/{} stylesheet reference(s)",
            report.resolved.len(),
            report.total()
        );
        report
    }

    async fn resolve_claiming(
        &self,
        reference: &StylesheetReference,
        html_path: &Path,
        page_url: Option<&Url>,
        claimed: &mut HashMap<PathBuf, Url>,
    ) -> Result<ResolvedResource, ResolutionFailure> {
        if reference.is_remote() {
            let url = parse_absolute_reference(reference)?;
            return self.resolve_remote(reference, url, claimed).await;
        }

        if let Some(page_url) = page_url {
            let url = page_url
                .join(reference.as_str())
                .map_err(|e| ResolutionFailure {
                    reference: reference.to_string(),
                    location: reference.to_string(),
                    error: format!("Failed to resolve against {page_url}: {e}"),
                })?;
            return self.resolve_remote(reference, url, claimed).await;
        }

        resolve_local(reference, html_path).await
    }

    async fn resolve_remote(
        &self,
        reference: &StylesheetReference,
        url: Url,
        claimed: &mut HashMap<PathBuf, Url>,
    ) -> Result<ResolvedResource, ResolutionFailure> {
        let failure = |error: String| ResolutionFailure {
            reference: reference.to_string(),
            location: url.to_string(),
            error,
        };

        let mirror_path = stylesheet_mirror_path(&url, self.materializer.domain_root())
            .map_err(|e| failure(e.to_string()))?;
        let target = unclaimed_path(mirror_path, &url, claimed);

        let local_path = self
            .materializer
            .materialize_stylesheet_to(&url, target)
            .await
            .map_err(|e| failure(e.to_string()))?;
        claimed.insert(local_path.clone(), url);

        Ok(ResolvedResource {
            origin: ResourceOrigin::Remote,
            reference: reference.clone(),
            local_path,
        })
    }
}

/// First of `path`, `path-2`, `path-3`, ... not already holding another URL
fn unclaimed_path(path: PathBuf, url: &Url, claimed: &HashMap<PathBuf, Url>) -> PathBuf {
    let is_free = |candidate: &PathBuf| claimed.get(candidate).is_none_or(|owner| owner == url);
    if is_free(&path) {
        return path;
    }
    (2..)
        .map(|n| numbered_path(&path, n))
        .find(is_free)
        .unwrap_or_default()
}

fn parse_absolute_reference(reference: &StylesheetReference) -> Result<Url, ResolutionFailure> {
    let raw = reference.as_str().trim();
    let absolute = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    };

    Url::parse(&absolute).map_err(|e| ResolutionFailure {
        reference: reference.to_string(),
        location: absolute,
        error: format!("Invalid URL: {e}"),
    })
}

/// Local candidate path for a relative reference
///
/// `./sub/file.css?v=1` next to `site/index.html` becomes `site/sub/file.css`.
#[must_use]
pub fn local_candidate_path(reference: &StylesheetReference, html_path: &Path) -> PathBuf {
    let relative = reference.without_query();
    let relative = relative.strip_prefix("./").unwrap_or(relative);
    let relative = relative.trim_start_matches('/');

    let html_dir = html_path.parent().unwrap_or_else(|| Path::new(""));
    html_dir.join(relative)
}

async fn resolve_local(
    reference: &StylesheetReference,
    html_path: &Path,
) -> Result<ResolvedResource, ResolutionFailure> {
    let candidate = local_candidate_path(reference, html_path);
    let failure = |error: String| ResolutionFailure {
        reference: reference.to_string(),
        location: candidate.display().to_string(),
        error,
    };

    let metadata = tokio::fs::metadata(&candidate)
        .await
        .map_err(|e| failure(e.to_string()))?;
    if !metadata.is_file() {
        return Err(failure("not a regular file".to_string()));
    }

    // Opening is the readability check
    tokio::fs::File::open(&candidate)
        .await
        .map_err(|e| failure(e.to_string()))?;

    Ok(ResolvedResource {
        origin: ResourceOrigin::Local,
        reference: reference.clone(),
        local_path: candidate,
    })
}

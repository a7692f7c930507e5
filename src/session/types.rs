//! Per-run session state

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::resolver::ResolvedResource;

/// Where the HTML document comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    CurrentFolder,
    Domain,
}

impl SourceMode {
    pub const ALL: [SourceMode; 2] = [SourceMode::CurrentFolder, SourceMode::Domain];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SourceMode::CurrentFolder => "Current folder",
            SourceMode::Domain => "Domain",
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Origin of the HTML document of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOrigin {
    /// Picked from a folder of the working directory
    Folder(PathBuf),
    /// Fetched from a page URL into the domain mirror
    Domain(Url),
}

/// Everything one run has established so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub origin: RequestOrigin,
    pub html_path: PathBuf,
    pub stylesheet: Option<ResolvedResource>,
}

impl GenerationRequest {
    #[must_use]
    pub fn local(folder: impl Into<PathBuf>, html_path: impl Into<PathBuf>) -> Self {
        Self {
            origin: RequestOrigin::Folder(folder.into()),
            html_path: html_path.into(),
            stylesheet: None,
        }
    }

    #[must_use]
    pub fn remote(page_url: Url, html_path: impl Into<PathBuf>) -> Self {
        Self {
            origin: RequestOrigin::Domain(page_url),
            html_path: html_path.into(),
            stylesheet: None,
        }
    }

    #[must_use]
    pub fn with_stylesheet(mut self, stylesheet: ResolvedResource) -> Self {
        self.stylesheet = Some(stylesheet);
        self
    }

    /// URL relative references resolve against, for fetched pages
    #[must_use]
    pub fn page_url(&self) -> Option<&Url> {
        match &self.origin {
            RequestOrigin::Domain(url) => Some(url),
            RequestOrigin::Folder(_) => None,
        }
    }

    #[must_use]
    pub fn css_path(&self) -> Option<&Path> {
        self.stylesheet.as_ref().map(|s| s.local_path.as_path())
    }
}

/// Progress of a single invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationState {
    #[default]
    Idle,
    Resolving,
    Invoking,
    Succeeded,
    Failed,
}

impl InvocationState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, InvocationState::Succeeded | InvocationState::Failed)
    }
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InvocationState::Idle => "idle",
            InvocationState::Resolving => "resolving",
            InvocationState::Invoking => "invoking",
            InvocationState::Succeeded => "succeeded",
            InvocationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

//! Type definitions for stylesheet resolution

use std::path::PathBuf;

use crate::error::GeneratorError;
use crate::link_extractor::StylesheetReference;

/// Where a resolved stylesheet came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOrigin {
    Local,
    Remote,
}

impl std::fmt::Display for ResourceOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceOrigin::Local => write!(f, "local"),
            ResourceOrigin::Remote => write!(f, "remote"),
        }
    }
}

/// A stylesheet reference turned into a readable file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    pub origin: ResourceOrigin,
    pub reference: StylesheetReference,
    pub local_path: PathBuf,
}

/// Error information for a reference that could not be resolved
#[derive(Debug, Clone)]
pub struct ResolutionFailure {
    pub reference: String,
    /// Local path or URL that was tried
    pub location: String,
    pub error: String,
}

impl std::fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error accessing CSS file {}: {}", self.location, self.error)
    }
}

impl From<ResolutionFailure> for GeneratorError {
    fn from(failure: ResolutionFailure) -> Self {
        GeneratorError::Resolution {
            reference: failure.reference,
            location: failure.location,
            message: failure.error,
        }
    }
}

/// Result of resolving every reference of a document, in document order
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    pub resolved: Vec<ResolvedResource>,
    pub failures: Vec<ResolutionFailure>,
}

impl ResolutionReport {
    /// Total number of references processed
    #[must_use]
    pub fn total(&self) -> usize {
        self.resolved.len() + self.failures.len()
    }

    /// Check if any failures occurred
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

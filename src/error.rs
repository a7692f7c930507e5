//! Error types for critical CSS generation
//!
//! Every failure of a run maps onto one of these variants. The session
//! catches them at the top level and prints them as user-facing messages.

use std::path::PathBuf;

/// Error types for the generation pipeline
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Nothing to work with: no folders, no HTML files or no stylesheet links
    #[error("{0}")]
    Discovery(String),

    /// A single stylesheet reference could not be turned into a readable file
    #[error("Error accessing CSS file {location}: {message}")]
    Resolution {
        reference: String,
        location: String,
        message: String,
    },

    /// A remote page or stylesheet could not be fetched
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The rendering capability reported a failure
    #[error("Failed to optimize CSS: {0}")]
    Render(String),

    /// Directory creation, read or write failure
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user aborted a prompt or the terminal is not interactive
    #[error("Prompt cancelled: {0}")]
    Prompt(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GeneratorError {
    /// Wrap an io error with the path it happened on
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Whether this error ends the run without being worth reporting
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Prompt(_))
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, GeneratorError>;

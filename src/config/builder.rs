//! Type-safe builder for `GeneratorConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that the domain root is set before building a `GeneratorConfig`.
//! Value ranges are checked in `build()`.

use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::{GeneratorConfig, ScreenshotFormat};
use crate::error::{GeneratorError, Result};

// Type states for the builder
pub struct WithDomainRoot;

pub struct GeneratorConfigBuilder<State = ()> {
    pub(crate) domain_root: Option<PathBuf>,
    pub(crate) config: GeneratorConfig,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for GeneratorConfigBuilder<()> {
    fn default() -> Self {
        Self {
            domain_root: None,
            config: GeneratorConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl GeneratorConfig {
    /// Create a builder for configuring a `GeneratorConfig` with a fluent interface
    ///
    /// # Example
    /// ```rust
    /// # use critical_css_generator::config::GeneratorConfig;
    /// # fn main() -> Result<(), critical_css_generator::GeneratorError> {
    /// let config = GeneratorConfig::builder()
    ///     .domain_root("./mirror")
    ///     .viewport(1440, 1024)
    ///     .build()?;
    /// assert_eq!(config.viewport_width(), 1440);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder<()> {
        GeneratorConfigBuilder::default()
    }
}

impl GeneratorConfigBuilder<()> {
    /// Directory under which fetched pages and stylesheets are mirrored
    pub fn domain_root(self, dir: impl Into<PathBuf>) -> GeneratorConfigBuilder<WithDomainRoot> {
        GeneratorConfigBuilder {
            domain_root: Some(dir.into()),
            config: self.config,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when the domain root is set
impl GeneratorConfigBuilder<WithDomainRoot> {
    pub fn build(self) -> Result<GeneratorConfig> {
        let mut config = self.config;

        let domain_root = self
            .domain_root
            .ok_or_else(|| GeneratorError::Config("domain_root is required".to_string()))?;
        config.domain_root = std::path::absolute(&domain_root).map_err(|e| {
            GeneratorError::Config(format!(
                "Cannot make domain root '{}' absolute: {e}",
                domain_root.display()
            ))
        })?;

        if config.viewport_width == 0 || config.viewport_height == 0 {
            return Err(GeneratorError::Config(format!(
                "viewport must be non-zero, got {}x{}",
                config.viewport_width, config.viewport_height
            )));
        }

        if config.render_timeout_ms == 0 {
            return Err(GeneratorError::Config(
                "render timeout must be greater than 0ms".to_string(),
            ));
        }

        if !(1..=100).contains(&config.screenshot_quality) {
            return Err(GeneratorError::Config(format!(
                "screenshot quality must be within 1..=100, got {}",
                config.screenshot_quality
            )));
        }

        if config.output_dir_name.is_empty()
            || config.output_dir_name.contains(['/', '\\'])
            || config.page_file_name.is_empty()
            || config.page_file_name.contains(['/', '\\'])
        {
            return Err(GeneratorError::Config(
                "output directory and page file names must be plain, non-empty names".to_string(),
            ));
        }

        Ok(config)
    }
}

// Builder methods available at any state
impl<State> GeneratorConfigBuilder<State> {
    /// Viewport used to decide what is above the fold
    #[must_use]
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    /// Time budget handed to the renderer
    #[must_use]
    pub fn render_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.render_timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn save_screenshots(mut self, save: bool) -> Self {
        self.config.save_screenshots = save;
        self
    }

    #[must_use]
    pub fn screenshot_format(mut self, format: ScreenshotFormat) -> Self {
        self.config.screenshot_format = format;
        self
    }

    /// JPEG quality, 1..=100
    #[must_use]
    pub fn screenshot_quality(mut self, quality: u8) -> Self {
        self.config.screenshot_quality = quality;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn output_dir_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_dir_name = name.into();
        self
    }

    #[must_use]
    pub fn page_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.page_file_name = name.into();
        self
    }

    #[must_use]
    pub fn max_page_size(mut self, bytes: usize) -> Self {
        self.config.max_page_size = bytes;
        self
    }

    #[must_use]
    pub fn max_stylesheet_size(mut self, bytes: usize) -> Self {
        self.config.max_stylesheet_size = bytes;
        self
    }

    /// Abort any single HTTP request after this many seconds
    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }
}

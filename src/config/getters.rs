//! Getter methods for `GeneratorConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `GeneratorConfig` instance.

use std::path::Path;
use std::time::Duration;

use super::types::{GeneratorConfig, ScreenshotFormat};

impl GeneratorConfig {
    #[must_use]
    pub fn domain_root(&self) -> &Path {
        &self.domain_root
    }

    #[must_use]
    pub fn output_dir_name(&self) -> &str {
        &self.output_dir_name
    }

    #[must_use]
    pub fn page_file_name(&self) -> &str {
        &self.page_file_name
    }

    #[must_use]
    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    #[must_use]
    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    #[must_use]
    pub fn render_timeout_ms(&self) -> u64 {
        self.render_timeout_ms
    }

    #[must_use]
    pub fn save_screenshots(&self) -> bool {
        self.save_screenshots
    }

    #[must_use]
    pub fn screenshot_format(&self) -> ScreenshotFormat {
        self.screenshot_format
    }

    #[must_use]
    pub fn screenshot_quality(&self) -> u8 {
        self.screenshot_quality
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    #[must_use]
    pub fn max_stylesheet_size(&self) -> usize {
        self.max_stylesheet_size
    }

    /// Per-request HTTP timeout, if one is configured
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

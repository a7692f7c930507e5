//! Core configuration types for critical CSS generation
//!
//! This module contains the main `GeneratorConfig` struct and its associated
//! types that define viewport, output layout and fetch parameters.

use serde::Serialize;
use std::path::PathBuf;

use crate::utils::{
    DEFAULT_RENDER_TIMEOUT_MS, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, MAX_PAGE_SIZE,
    MAX_STYLESHEET_SIZE, OUTPUT_DIR_NAME, PAGE_FILE_NAME, SCREENSHOT_QUALITY,
};

/// Image format used for before/after screenshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotFormat {
    #[default]
    Jpeg,
    Png,
}

impl ScreenshotFormat {
    /// File extension written for this format
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ScreenshotFormat::Jpeg => "jpg",
            ScreenshotFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for ScreenshotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenshotFormat::Jpeg => write!(f, "jpeg"),
            ScreenshotFormat::Png => write!(f, "png"),
        }
    }
}

/// Main configuration struct for a generation run
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorConfig {
    /// Directory under which `<host>/temp.html` and `<host>/css/*` are written
    /// in domain mode.
    pub(crate) domain_root: PathBuf,

    /// Name of the output directory created next to the HTML file
    pub(crate) output_dir_name: String,

    /// File name a fetched page is stored under inside its domain folder
    pub(crate) page_file_name: String,

    pub(crate) viewport_width: u32,
    pub(crate) viewport_height: u32,

    /// Opaque time budget handed to the renderer, in milliseconds
    pub(crate) render_timeout_ms: u64,

    pub(crate) save_screenshots: bool,
    pub(crate) screenshot_format: ScreenshotFormat,
    pub(crate) screenshot_quality: u8,

    pub(crate) headless: bool,

    /// Maximum size of a fetched HTML page in bytes
    pub(crate) max_page_size: usize,

    /// Maximum size of a fetched stylesheet in bytes
    pub(crate) max_stylesheet_size: usize,

    /// Optional timeout for each HTTP request
    ///
    /// Default: None (the fetch waits as long as the server keeps the connection)
    pub(crate) request_timeout_secs: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            domain_root: PathBuf::from("."),
            output_dir_name: OUTPUT_DIR_NAME.to_string(),
            page_file_name: PAGE_FILE_NAME.to_string(),
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            render_timeout_ms: DEFAULT_RENDER_TIMEOUT_MS,
            save_screenshots: true,
            screenshot_format: ScreenshotFormat::Jpeg,
            screenshot_quality: SCREENSHOT_QUALITY,
            headless: true,
            max_page_size: MAX_PAGE_SIZE,
            max_stylesheet_size: MAX_STYLESHEET_SIZE,
            request_timeout_secs: None,
        }
    }
}

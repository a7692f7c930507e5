//! Shared configuration constants for critical-css-generator
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Name of the directory created next to the source HTML file to hold
/// generated critical CSS and screenshots.
pub const OUTPUT_DIR_NAME: &str = "critical-css-generator";

/// Prefix of every generated stylesheet: `critical-<name>.css`
pub const OUTPUT_FILE_PREFIX: &str = "critical-";

/// File name a fetched HTML page is stored under inside its domain folder
pub const PAGE_FILE_NAME: &str = "temp.html";

/// Sub-folder of a domain folder holding fetched stylesheets
pub const STYLESHEET_DIR_NAME: &str = "css";

/// Fallback file name for stylesheet URLs ending in `/`
pub const FALLBACK_STYLESHEET_NAME: &str = "index.css";

/// Default viewport width in CSS pixels
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1200;

/// Default viewport height in CSS pixels
///
/// Everything intersecting `0..height` after load counts as above the fold.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 900;

/// Default time budget for a single render, in milliseconds
pub const DEFAULT_RENDER_TIMEOUT_MS: u64 = 30_000;

/// Default JPEG screenshot quality; ignored for PNG
pub const SCREENSHOT_QUALITY: u8 = 50;

/// Maximum size of a fetched HTML page (bytes)
pub const MAX_PAGE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum size of a fetched stylesheet (bytes)
///
/// Typical: 50-200KB, Large frameworks: 500KB-1MB
pub const MAX_STYLESHEET_SIZE: usize = 2 * 1024 * 1024;

/// Chrome user agent string sent with every fetch and by the browser
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

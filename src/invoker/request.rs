//! Contract between the invoker and the rendering capability

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ScreenshotFormat;

/// Where and how screenshots should be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotConfig {
    /// Path without extension; renderers append a suffix and extension
    pub base_path: PathBuf,
    #[serde(rename = "type")]
    pub format: ScreenshotFormat,
    /// Only meaningful for JPEG
    pub quality: u8,
}

impl ScreenshotConfig {
    /// `<base>-<suffix>.<ext>`, e.g. `index-before.jpg`
    #[must_use]
    pub fn path_for(&self, suffix: &str) -> PathBuf {
        let mut file_name = self
            .base_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        file_name.push('-');
        file_name.push_str(suffix);
        file_name.push('.');
        file_name.push_str(self.format.extension());

        self.base_path.with_file_name(file_name)
    }
}

/// Everything a renderer needs to compute critical CSS for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// `file://` URL of the local HTML file
    pub url: String,
    /// Local path of the stylesheet to reduce
    pub css: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Opaque budget for the whole render, in milliseconds
    pub timeout: u64,
    pub screenshots: Option<ScreenshotConfig>,
}

impl RenderRequest {
    #[must_use]
    pub fn css_path(&self) -> &Path {
        &self.css
    }
}

/// Capability that computes the critical CSS of a page
///
/// Returns the raw CSS bytes to be written verbatim, or an error describing
/// why the page or stylesheet could not be processed.
pub trait CriticalCssRenderer {
    fn render(
        &self,
        request: &RenderRequest,
    ) -> impl Future<Output = anyhow::Result<Vec<u8>>> + Send;
}

impl<R: CriticalCssRenderer + Sync> CriticalCssRenderer for &R {
    fn render(
        &self,
        request: &RenderRequest,
    ) -> impl Future<Output = anyhow::Result<Vec<u8>>> + Send {
        (**self).render(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_path_for() {
        let config = ScreenshotConfig {
            base_path: PathBuf::from("site/critical-css-generator/index"),
            format: ScreenshotFormat::Jpeg,
            quality: 50,
        };
        assert_eq!(
            config.path_for("before"),
            PathBuf::from("site/critical-css-generator/index-before.jpg")
        );
    }

    #[test]
    fn test_request_serialized_keys() {
        let request = RenderRequest {
            url: "file:///site/index.html".to_string(),
            css: PathBuf::from("/site/main.css"),
            width: 1200,
            height: 900,
            timeout: 30_000,
            screenshots: Some(ScreenshotConfig {
                base_path: PathBuf::from("/site/critical-css-generator/index"),
                format: ScreenshotFormat::Png,
                quality: 50,
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["url"], "file:///site/index.html");
        assert_eq!(value["width"], 1200);
        assert_eq!(value["screenshots"]["basePath"], "/site/critical-css-generator/index");
        assert_eq!(value["screenshots"]["type"], "png");
    }
}

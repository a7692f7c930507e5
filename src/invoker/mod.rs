//! Critical CSS invocation
//!
//! Derives the output layout for a resolved (HTML, CSS) pair, hands a
//! [`RenderRequest`] to the rendering capability and writes its output:
//!
//! ```text
//! <html-dir>/critical-css-generator/critical-<css base name>.css
//! <html-dir>/critical-css-generator/<html base name>-before.<ext>
//! <html-dir>/critical-css-generator/<html base name>-after.<ext>
//! ```
//!
//! The output file is only touched after a successful render, so a failed
//! run leaves any earlier result in place.

mod request;

pub use request::{CriticalCssRenderer, RenderRequest, ScreenshotConfig};

use std::path::{Path, PathBuf};

use url::Url;

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::utils::{OUTPUT_FILE_PREFIX, css_base_name};

/// Paths derived from the HTML and CSS inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub output_dir: PathBuf,
    pub output_file: PathBuf,
    /// Screenshot path without suffix or extension
    pub screenshot_base: PathBuf,
}

impl OutputPaths {
    /// Derive the output layout for an HTML file and a stylesheet
    pub fn derive(html_path: &Path, css_path: &Path, output_dir_name: &str) -> Result<Self> {
        let invalid = |what: &str, path: &Path| {
            GeneratorError::filesystem(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, what.to_string()),
            )
        };

        let html_dir = html_path.parent().unwrap_or_else(|| Path::new(""));
        let html_stem = html_path
            .file_stem()
            .ok_or_else(|| invalid("HTML path has no file name", html_path))?;
        let css_file_name = css_path
            .file_name()
            .ok_or_else(|| invalid("CSS path has no file name", css_path))?;

        let output_dir = html_dir.join(output_dir_name);
        let output_file = output_dir.join(format!(
            "{OUTPUT_FILE_PREFIX}{}.css",
            css_base_name(&css_file_name.to_string_lossy())
        ));
        let screenshot_base = output_dir.join(html_stem);

        Ok(Self {
            output_dir,
            output_file,
            screenshot_base,
        })
    }
}

/// Result of a successful invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    pub paths: OutputPaths,
    pub bytes_written: usize,
}

/// Runs the rendering capability for one resolved (HTML, CSS) pair
pub struct CriticalCssInvoker<'a, R> {
    renderer: &'a R,
    config: &'a GeneratorConfig,
}

impl<'a, R: CriticalCssRenderer> CriticalCssInvoker<'a, R> {
    #[must_use]
    pub fn new(renderer: &'a R, config: &'a GeneratorConfig) -> Self {
        Self { renderer, config }
    }

    /// Build the request handed to the renderer
    pub async fn prepare(&self, html_path: &Path, css_path: &Path) -> Result<(RenderRequest, OutputPaths)> {
        let paths = OutputPaths::derive(html_path, css_path, self.config.output_dir_name())?;

        let absolute_html = tokio::fs::canonicalize(html_path)
            .await
            .map_err(|e| GeneratorError::filesystem(html_path, e))?;
        let url = Url::from_file_path(&absolute_html).map_err(|()| {
            GeneratorError::Render(format!(
                "Cannot build a file URL for {}",
                absolute_html.display()
            ))
        })?;

        let screenshots = self.config.save_screenshots().then(|| ScreenshotConfig {
            base_path: paths.screenshot_base.clone(),
            format: self.config.screenshot_format(),
            quality: self.config.screenshot_quality(),
        });

        let request = RenderRequest {
            url: url.to_string(),
            css: css_path.to_path_buf(),
            width: self.config.viewport_width(),
            height: self.config.viewport_height(),
            timeout: self.config.render_timeout_ms(),
            screenshots,
        };

        Ok((request, paths))
    }

    /// Render and write the critical CSS for `html_path` + `css_path`
    pub async fn invoke(&self, html_path: &Path, css_path: &Path) -> Result<InvocationOutcome> {
        let (request, paths) = self.prepare(html_path, css_path).await?;

        // Screenshots land in the output directory while rendering
        tokio::fs::create_dir_all(&paths.output_dir)
            .await
            .map_err(|e| GeneratorError::filesystem(&paths.output_dir, e))?;

        log::info!(
            "Rendering {} with {} at {}x{}",
            request.url,
            css_path.display(),
            request.width,
            request.height
        );

        let critical_css = self
            .renderer
            .render(&request)
            .await
            .map_err(|e| GeneratorError::Render(format!("{e:#}")))?;

        write_replacing(&paths.output_file, &critical_css).await?;
        log::info!(
            "Wrote {} bytes of critical CSS to {}",
            critical_css.len(),
            paths.output_file.display()
        );

        Ok(InvocationOutcome {
            paths,
            bytes_written: critical_css.len(),
        })
    }
}

/// Write through a sibling temp file and rename over the target
async fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| GeneratorError::filesystem(parent, e))?;
    }

    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|e| GeneratorError::filesystem(&tmp_path, e))?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(GeneratorError::filesystem(path, e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedRenderer {
        output: std::result::Result<Vec<u8>, String>,
        requests: Mutex<Vec<RenderRequest>>,
    }

    impl FixedRenderer {
        fn ok(css: &str) -> Self {
            Self {
                output: Ok(css.as_bytes().to_vec()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                output: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl CriticalCssRenderer for FixedRenderer {
        async fn render(&self, request: &RenderRequest) -> anyhow::Result<Vec<u8>> {
            self.requests.lock().unwrap().push(request.clone());
            self.output.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    fn config(root: &Path) -> GeneratorConfig {
        GeneratorConfig::builder().domain_root(root).build().unwrap()
    }

    fn site(root: &Path) -> (PathBuf, PathBuf) {
        let site = root.join("site");
        std::fs::create_dir_all(site.join("styles")).unwrap();
        std::fs::write(site.join("index.html"), "<html></html>").unwrap();
        std::fs::write(site.join("styles/main.css"), "body{margin:0}").unwrap();
        (site.join("index.html"), site.join("styles/main.css"))
    }

    #[test]
    fn test_derive_output_paths() {
        let paths = OutputPaths::derive(
            Path::new("site/index.html"),
            Path::new("site/styles/main.css"),
            "critical-css-generator",
        )
        .unwrap();

        assert_eq!(paths.output_dir, PathBuf::from("site/critical-css-generator"));
        assert_eq!(
            paths.output_file,
            PathBuf::from("site/critical-css-generator/critical-main.css")
        );
        assert_eq!(
            paths.screenshot_base,
            PathBuf::from("site/critical-css-generator/index")
        );
    }

    #[test]
    fn test_derive_strips_query_from_css_name() {
        let paths = OutputPaths::derive(
            Path::new("out/host/temp.html"),
            Path::new("out/host/css/file.css?v=2"),
            "critical-css-generator",
        )
        .unwrap();

        assert_eq!(
            paths.output_file,
            PathBuf::from("out/host/critical-css-generator/critical-file.css")
        );
        assert_eq!(
            paths.screenshot_base,
            PathBuf::from("out/host/critical-css-generator/temp")
        );
    }

    #[tokio::test]
    async fn test_invoke_writes_renderer_output() {
        let dir = tempfile::tempdir().unwrap();
        let (html, css) = site(dir.path());
        let config = config(dir.path());
        let renderer = FixedRenderer::ok("body{margin:0}");

        let outcome = CriticalCssInvoker::new(&renderer, &config)
            .invoke(&html, &css)
            .await
            .unwrap();

        let expected = dir.path().join("site/critical-css-generator/critical-main.css");
        assert_eq!(outcome.paths.output_file, expected);
        assert_eq!(outcome.bytes_written, 14);
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "body{margin:0}");

        let requests = renderer.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.starts_with("file://"));
        assert!(requests[0].url.ends_with("/site/index.html"));
        assert_eq!(requests[0].css, css);
        assert_eq!((requests[0].width, requests[0].height), (1200, 900));
        let screenshots = requests[0].screenshots.as_ref().unwrap();
        assert_eq!(
            screenshots.base_path,
            dir.path().join("site/critical-css-generator/index")
        );
    }

    #[tokio::test]
    async fn test_invoke_twice_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let (html, css) = site(dir.path());
        let config = config(dir.path());
        let renderer = FixedRenderer::ok("h1{color:red}");
        let invoker = CriticalCssInvoker::new(&renderer, &config);

        let first = invoker.invoke(&html, &css).await.unwrap();
        let first_bytes = std::fs::read(&first.paths.output_file).unwrap();
        let second = invoker.invoke(&html, &css).await.unwrap();
        let second_bytes = std::fs::read(&second.paths.output_file).unwrap();

        assert_eq!(first_bytes, second_bytes);
        assert_eq!(second_bytes, b"h1{color:red}");
    }

    #[tokio::test]
    async fn test_failed_render_leaves_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let (html, css) = site(dir.path());
        let config = config(dir.path());

        let output = dir.path().join("site/critical-css-generator/critical-main.css");
        std::fs::create_dir_all(output.parent().unwrap()).unwrap();
        std::fs::write(&output, "previous").unwrap();

        let renderer = FixedRenderer::failing("page failed to load");
        let err = CriticalCssInvoker::new(&renderer, &config)
            .invoke(&html, &css)
            .await
            .unwrap_err();

        assert!(matches!(err, GeneratorError::Render(ref m) if m.contains("page failed to load")));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous");
    }

    #[tokio::test]
    async fn test_failed_render_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (html, css) = site(dir.path());
        let config = config(dir.path());
        let renderer = FixedRenderer::failing("boom");

        let result = CriticalCssInvoker::new(&renderer, &config)
            .invoke(&html, &css)
            .await;

        assert!(result.is_err());
        assert!(!dir
            .path()
            .join("site/critical-css-generator/critical-main.css")
            .exists());
    }

    #[tokio::test]
    async fn test_screenshots_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let (html, css) = site(dir.path());
        let config = GeneratorConfig::builder()
            .domain_root(dir.path())
            .save_screenshots(false)
            .build()
            .unwrap();
        let renderer = FixedRenderer::ok("");

        let invoker = CriticalCssInvoker::new(&renderer, &config);
        let (request, _) = invoker.prepare(&html, &css).await.unwrap();

        assert!(request.screenshots.is_none());
    }
}

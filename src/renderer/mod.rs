//! Headless Chrome implementation of [`CriticalCssRenderer`]
//!
//! Each render launches a fresh browser, loads the page at the requested
//! viewport and reduces the stylesheet inside the page with
//! [`scripts::CRITICAL_CSS_SCRIPT`]. With screenshots enabled the page is
//! captured before and after its stylesheets are replaced by the result.

mod browser;
pub mod scripts;

pub use browser::{BROWSER_PATH_ENV, BrowserSession, download_managed_browser, find_browser_executable};

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};

use crate::config::ScreenshotFormat;
use crate::invoker::{CriticalCssRenderer, RenderRequest, ScreenshotConfig};
use scripts::{APPLY_CRITICAL_CSS_SCRIPT, CRITICAL_CSS_SCRIPT, READY_STATE_SCRIPT};

/// Renders pages in Chrome/Chromium through the DevTools protocol
#[derive(Debug, Clone, Copy)]
pub struct ChromiumRenderer {
    headless: bool,
}

impl ChromiumRenderer {
    #[must_use]
    pub fn new(headless: bool) -> Self {
        Self { headless }
    }
}

impl Default for ChromiumRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CriticalCssRenderer for ChromiumRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        let css_text = tokio::fs::read_to_string(request.css_path())
            .await
            .with_context(|| format!("Failed to read {}", request.css_path().display()))?;

        let session = BrowserSession::launch(self.headless, (request.width, request.height)).await?;
        let outcome = tokio::time::timeout(
            Duration::from_millis(request.timeout),
            render_page(&session, request, &css_text),
        )
        .await;
        session.shutdown().await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "Timed out after {} ms rendering {}",
                request.timeout,
                request.url
            )),
        }
    }
}

async fn render_page(session: &BrowserSession, request: &RenderRequest, css_text: &str) -> Result<Vec<u8>> {
    let page = session
        .browser()
        .new_page("about:blank")
        .await
        .context("Failed to open a browser page")?;

    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(request.width))
            .height(i64::from(request.height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await
    .context("Failed to set viewport")?;

    page.goto(request.url.as_str())
        .await
        .with_context(|| format!("Failed to load {}", request.url))?;
    wait_for_page_load(&page).await;

    if let Some(screenshots) = &request.screenshots {
        capture_screenshot(&page, screenshots, "before").await?;
    }

    let expression = critical_css_expression(css_text, request.width, request.height)?;
    let critical: String = page
        .evaluate(expression.as_str())
        .await
        .context("Critical CSS script failed")?
        .into_value()
        .context("Critical CSS script did not return a string")?;
    log::debug!(
        "Reduced {} bytes of CSS to {} bytes",
        css_text.len(),
        critical.len()
    );

    if let Some(screenshots) = &request.screenshots {
        let apply = format!(
            "({APPLY_CRITICAL_CSS_SCRIPT})({})",
            serde_json::to_string(&critical)?
        );
        page.evaluate(apply.as_str())
            .await
            .context("Failed to apply critical CSS to the page")?;
        wait_for_page_load(&page).await;
        capture_screenshot(&page, screenshots, "after").await?;
    }

    if let Err(e) = page.close().await {
        log::debug!("Failed to close page: {e}");
    }

    Ok(critical.into_bytes())
}

/// Invocation of the reduction script with its arguments inlined
pub fn critical_css_expression(css_text: &str, width: u32, height: u32) -> Result<String> {
    Ok(format!(
        "({CRITICAL_CSS_SCRIPT})({}, {width}, {height})",
        serde_json::to_string(css_text)?
    ))
}

/// Poll until `document.readyState` is complete
///
/// Runs inside the render timeout, so it has no deadline of its own.
async fn wait_for_page_load(page: &Page) {
    let poll_interval = Duration::from_millis(100);

    loop {
        match page.evaluate(READY_STATE_SCRIPT).await {
            Ok(result) => {
                if let Ok(value) = result.into_value::<serde_json::Value>() {
                    let complete = value.get("readyState").and_then(|v| v.as_str()) == Some("complete");
                    let body_exists = value.get("bodyExists").and_then(|v| v.as_bool()).unwrap_or(false);
                    let images_loaded = value.get("imagesLoaded").and_then(|v| v.as_bool()).unwrap_or(false);

                    if complete && body_exists {
                        if !images_loaded {
                            tokio::time::sleep(Duration::from_millis(500)).await;
                        }
                        break;
                    }
                }
            }
            Err(e) => log::debug!("Failed to check readyState: {e}, retrying"),
        }
        tokio::time::sleep(poll_interval).await;
    }

    // Let pending style recalculation settle
    tokio::time::sleep(Duration::from_millis(200)).await;
}

async fn capture_screenshot(page: &Page, config: &ScreenshotConfig, suffix: &str) -> Result<()> {
    let path = config.path_for(suffix);
    let (format, quality) = match config.format {
        ScreenshotFormat::Jpeg => (CaptureScreenshotFormat::Jpeg, Some(i64::from(config.quality))),
        ScreenshotFormat::Png => (CaptureScreenshotFormat::Png, None),
    };

    let params = CaptureScreenshotParams {
        format: Some(format),
        quality,
        ..Default::default()
    };

    let data = page
        .screenshot(params)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to capture screenshot: {e}"))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, data)
        .await
        .with_context(|| format!("Failed to write screenshot {}", path.display()))?;

    log::info!("Saved screenshot {}", path.display());
    Ok(())
}

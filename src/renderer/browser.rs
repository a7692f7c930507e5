//! Chrome/Chromium discovery and lifecycle

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

use crate::utils::constants::{CHROME_USER_AGENT, OUTPUT_DIR_NAME};

/// Environment variable pointing at a browser executable
pub const BROWSER_PATH_ENV: &str = "CHROMIUM_PATH";

fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = if cfg!(target_os = "windows") {
        [
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
        .iter()
        .map(PathBuf::from)
        .collect()
    } else if cfg!(target_os = "macos") {
        [
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
        .iter()
        .map(PathBuf::from)
        .collect()
    } else {
        [
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
        ]
        .iter()
        .map(PathBuf::from)
        .collect()
    };

    if cfg!(target_os = "windows") {
        if let Some(local) = dirs::data_local_dir() {
            candidates.push(local.join(r"Google\Chrome\Application\chrome.exe"));
        }
    } else if cfg!(target_os = "macos")
        && let Some(home) = dirs::home_dir()
    {
        candidates.push(home.join("Applications/Google Chrome.app/Contents/MacOS/Google Chrome"));
    }

    candidates
}

/// Locate an installed Chrome/Chromium
pub fn find_browser_executable() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(BROWSER_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Using browser from {BROWSER_PATH_ENV}: {}", path.display());
            return Some(path);
        }
        warn!(
            "{BROWSER_PATH_ENV} points to a missing file: {}",
            path.display()
        );
    }

    if let Some(path) = candidate_paths().into_iter().find(|p| p.exists()) {
        info!("Found browser at: {}", path.display());
        return Some(path);
    }

    if !cfg!(target_os = "windows") {
        for cmd in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !found.is_empty() {
                    info!("Found browser on PATH: {found}");
                    return Some(PathBuf::from(found));
                }
            }
        }
    }

    None
}

/// Download a Chromium build into the user cache directory
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(OUTPUT_DIR_NAME)
        .join("chromium");

    info!("Downloading Chromium into {}", cache_dir.display());
    tokio::fs::create_dir_all(&cache_dir)
        .await
        .context("Failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );
    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;

    info!("Downloaded Chromium to: {}", revision.folder_path.display());
    Ok(revision.executable_path)
}

/// A launched browser, its CDP event loop and its throwaway profile
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserSession {
    /// Find or download a browser and launch it
    pub async fn launch(headless: bool, window: (u32, u32)) -> Result<Self> {
        let executable = match find_browser_executable() {
            Some(path) => path,
            None => {
                warn!("No Chrome/Chromium executable found, downloading one");
                download_managed_browser().await?
            }
        };

        let user_data_dir = std::env::temp_dir().join(format!(
            "{OUTPUT_DIR_NAME}-chrome-{}",
            std::process::id()
        ));
        tokio::fs::create_dir_all(&user_data_dir)
            .await
            .context("Failed to create user data directory")?;

        let mut builder = BrowserConfigBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .window_size(window.0, window.1)
            .user_data_dir(user_data_dir.clone())
            .chrome_executable(executable);

        builder = if headless {
            builder.headless_mode(HeadlessMode::default())
        } else {
            builder.with_head()
        };

        // Local file pages reference sibling files directly
        builder = builder
            .arg(format!("--user-agent={CHROME_USER_AGENT}"))
            .arg("--allow-file-access-from-files")
            .arg("--disable-web-security")
            .arg("--disable-extensions")
            .arg("--disable-notifications")
            .arg("--disable-background-networking")
            .arg("--disable-setuid-sandbox")
            .arg("--no-sandbox")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--hide-scrollbars")
            .arg("--mute-audio");

        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

        debug!("Launching browser with config: {config:?}");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch browser")?;

        let handler = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let message = e.to_string();
                    // Unknown CDP events chromiumoxide cannot deserialize
                    if message.contains("data did not match any variant of untagged enum Message")
                        || message.contains("Failed to deserialize WS response")
                    {
                        trace!("Ignoring CDP deserialization error: {message}");
                    } else {
                        warn!("Browser handler error: {e:?}");
                    }
                }
            }
            debug!("Browser handler task completed");
        });

        Ok(Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        })
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the browser, wait for the process, then remove the profile
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {e}");
        }
        self.handler.abort();
        self.remove_profile();
    }

    fn remove_profile(&mut self) {
        if let Some(path) = self.user_data_dir.take()
            && let Err(e) = std::fs::remove_dir_all(&path)
        {
            warn!("Failed to remove browser profile {}: {e}", path.display());
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Reached without shutdown() when a render times out
        self.handler.abort();
        self.remove_profile();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_paths_not_empty() {
        assert!(!candidate_paths().is_empty());
    }
}

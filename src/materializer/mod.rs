//! Remote resource materialization
//!
//! Fetches HTML pages and stylesheets over HTTP(S) and writes the response
//! bodies verbatim into the domain mirror:
//!
//! ```text
//! <domain-root>/<host>/temp.html
//! <domain-root>/<host>/css/<file name>
//! ```
//!
//! Existing files are overwritten. Whether a failure is fatal is up to the
//! caller: the session aborts on a failed page fetch, the resolver only skips
//! the one stylesheet.

mod downloader;

pub use downloader::ResourceKind;

use std::path::{Path, PathBuf};

use reqwest::Client;
use url::Url;

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::utils::{CHROME_USER_AGENT, page_mirror_path, stylesheet_mirror_path};

/// A fetched HTML page and where it was stored
#[derive(Debug, Clone)]
pub struct MaterializedPage {
    pub url: Url,
    pub path: PathBuf,
    pub html: String,
}

/// Fetches remote resources and persists them under the domain root
#[derive(Debug, Clone)]
pub struct ResourceMaterializer {
    // Client already uses Arc internally, so cloning is cheap
    client: Client,
    domain_root: PathBuf,
    page_file_name: String,
    max_page_size: usize,
    max_stylesheet_size: usize,
}

impl ResourceMaterializer {
    /// Create a materializer with a browser-like HTTP client
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(CHROME_USER_AGENT);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| GeneratorError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            domain_root: config.domain_root().to_path_buf(),
            page_file_name: config.page_file_name().to_string(),
            max_page_size: config.max_page_size(),
            max_stylesheet_size: config.max_stylesheet_size(),
        })
    }

    #[must_use]
    pub fn domain_root(&self) -> &Path {
        &self.domain_root
    }

    /// Fetch a resource body without persisting it
    pub async fn fetch(&self, url: &Url, kind: ResourceKind) -> Result<Vec<u8>> {
        let max_size = match kind {
            ResourceKind::Page => self.max_page_size,
            ResourceKind::Stylesheet => self.max_stylesheet_size,
        };
        downloader::download_core(&self.client, url.as_str(), kind, max_size).await
    }

    /// Fetch an HTML page and store it as `<domain-root>/<host>/<page file>`
    pub async fn materialize_page(&self, url: &Url) -> Result<MaterializedPage> {
        let path = page_mirror_path(url, &self.domain_root, &self.page_file_name)?;
        let body = self.fetch(url, ResourceKind::Page).await?;

        persist(&path, &body).await?;
        log::info!("Saved page {url} to {}", path.display());

        Ok(MaterializedPage {
            url: url.clone(),
            path,
            html: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    /// Fetch a stylesheet and store it as `<domain-root>/<host>/css/<last segment>`
    pub async fn materialize_stylesheet(&self, url: &Url) -> Result<PathBuf> {
        let path = stylesheet_mirror_path(url, &self.domain_root)?;
        self.materialize_stylesheet_to(url, path).await
    }

    /// Fetch a stylesheet and store it at an explicit mirror path
    pub async fn materialize_stylesheet_to(&self, url: &Url, path: PathBuf) -> Result<PathBuf> {
        let body = self.fetch(url, ResourceKind::Stylesheet).await?;

        persist(&path, &body).await?;
        log::info!("Saved stylesheet {url} to {}", path.display());

        Ok(path)
    }
}

/// Write bytes to `path`, creating parent directories as needed
async fn persist(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        GeneratorError::filesystem(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent directory"),
        )
    })?;

    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| GeneratorError::filesystem(parent, e))?;

    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| GeneratorError::filesystem(path, e))
}

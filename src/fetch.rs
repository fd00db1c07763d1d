use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use ureq::ResponseExt;

use crate::error::Result;
use crate::site::SiteId;

/// Default HTTP request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Marketplaces serve bot-detection pages to unknown agents
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Shared HTTP agent for connection pooling
static HTTP_AGENT: Lazy<ureq::Agent> = Lazy::new(|| {
    ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
        .build()
        .into()
});

/// HTML loaded from a URL or a saved file
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Final URL after redirects, or the file path
    pub source: String,
    /// Raw HTML content
    pub html: String,
    /// Site detected from the URL host (`SiteId::None` for files)
    pub detected_site: SiteId,
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load a page from an `http(s)://` URL or a local file path
pub fn load(source: &str) -> Result<PageContent> {
    if is_url(source) {
        fetch_http(source)
    } else {
        read_file(Path::new(source))
    }
}

/// Fetch using HTTP (ureq)
fn fetch_http(url: &str) -> Result<PageContent> {
    tracing::debug!(url, "fetching page");
    let response = HTTP_AGENT
        .get(url)
        .header("User-Agent", USER_AGENT)
        .header("Accept", "text/html,application/xhtml+xml")
        .call()?;
    let final_url = response.get_uri().to_string();
    let html = response.into_body().read_to_string()?;
    tracing::debug!(url = %final_url, bytes = html.len(), "fetched page");

    Ok(PageContent {
        detected_site: SiteId::from_url(&final_url),
        source: final_url,
        html,
    })
}

fn read_file(path: &Path) -> Result<PageContent> {
    let html = std::fs::read_to_string(path)?;
    Ok(PageContent {
        source: path.display().to_string(),
        html,
        detected_site: SiteId::None,
    })
}

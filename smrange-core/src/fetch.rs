use crate::error::{Result, SitemapError};
use reqwest::Client;
use tracing::debug;

/// Thin HTTP GET wrapper. One request per sitemap node, no retries;
/// a failed fetch only ever aborts the node that needed it.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent(concat!("smrange/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// GET a URL and return its body as text. Any transport failure or
    /// non-2xx status maps to [`SitemapError::Fetch`] carrying the URL.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);

        let wrap = |source: reqwest::Error| SitemapError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(wrap)?;
        let response = response.error_for_status().map_err(wrap)?;
        response.text().await.map_err(wrap)
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new(10)
    }
}

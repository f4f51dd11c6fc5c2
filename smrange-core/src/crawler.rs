use crate::dates::TimeWindow;
use crate::error::{Result, SitemapError};
use crate::fetch::PageFetcher;
use crate::parse::{parse, ParsedDocument, ParsingMethod};
use crate::sitemap::{self, Article, SitemapKind, SitemapRef};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// How many second-pass sub-sitemaps are fetched at once. The candidate
/// set is fixed and deduplicated before fan-out, so no URL is fetched
/// twice; the ordered combinator keeps declaration order in the result.
const PARALLEL_FETCHES: usize = 8;

/// Walks a site's sitemap hierarchy, as advertised in robots.txt, and
/// collects article references inside a time window.
///
/// The traversal is two passes deep by design: robots.txt names the entry
/// points, sitemap indexes found there are expanded exactly once. Real
/// sites do not nest further, and the bound keeps cost predictable.
pub struct SitemapCrawler {
    fetcher: PageFetcher,
    parsing_method: ParsingMethod,
    strip_timezone: bool,
}

impl SitemapCrawler {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            fetcher: PageFetcher::new(timeout_secs),
            parsing_method: ParsingMethod::Strict,
            strip_timezone: false,
        }
    }

    pub fn with_parsing_method(mut self, method: ParsingMethod) -> Self {
        self.parsing_method = method;
        self
    }

    /// Discard timezone offsets before range comparison. Tolerates sites
    /// that mix offset-aware and offset-naive timestamps.
    pub fn with_strip_timezone(mut self, strip: bool) -> Self {
        self.strip_timezone = strip;
        self
    }

    /// Collect every in-window article reference reachable from the
    /// site's robots.txt.
    ///
    /// Only two failures are fatal: a site URL that is not http(s), and a
    /// failed robots.txt fetch (there is no other entry point). Anything
    /// that goes wrong with an individual sitemap skips that sitemap.
    pub async fn collect_articles(&self, site: &str, window: &TimeWindow) -> Result<Vec<Article>> {
        let parsed = Url::parse(site).map_err(|e| SitemapError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SitemapError::InvalidUrl(format!(
                "{site}: expected an http:// or https:// URL"
            )));
        }

        let robots_url = format!("{}/robots.txt", site.trim_end_matches('/'));
        let robots = self.fetcher.fetch_text(&robots_url).await?;

        let mut visited: HashSet<String> = HashSet::new();
        let mut pending: Vec<SitemapRef> = Vec::new();
        let mut articles: Vec<Article> = Vec::new();

        // Pass 1: classify each robots.txt entry point. Url sets yield
        // articles directly, index entries queue sub-sitemaps.
        for url in sitemap_urls(&robots) {
            if !visited.insert(url.to_string()) {
                continue;
            }

            info!(url, "processing sitemap");
            let doc = match self.fetch_document(url).await {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(url, error = %e, "skipping sitemap");
                    continue;
                }
            };

            match sitemap::classify(&doc) {
                SitemapKind::Index => {
                    pending.extend(sitemap::sitemap_refs(&doc, window, self.strip_timezone));
                }
                SitemapKind::UrlSet => {
                    articles.extend(sitemap::article_refs(&doc, window, self.strip_timezone));
                }
                SitemapKind::Unknown => {
                    debug!(url, root = doc.root_name(), "not a sitemap, ignoring");
                }
            }
        }

        // Pass 2: expand the queued sub-sitemaps, one level only. The
        // candidate set is marked visited up front, then fetched
        // concurrently; everything fetched here is treated as a url set
        // whatever its root tag says.
        let candidates: Vec<String> = pending
            .into_iter()
            .filter(|sm| visited.insert(sm.url.clone()))
            .map(|sm| sm.url)
            .collect();

        let expanded: Vec<Option<Vec<Article>>> = stream::iter(candidates)
            .map(|url| async move {
                info!(url = %url, "processing sitemap");
                match self.fetch_document(&url).await {
                    Ok(doc) => Some(sitemap::article_refs(&doc, window, self.strip_timezone)),
                    Err(e) => {
                        warn!(url = %url, error = %e, "skipping sitemap");
                        None
                    }
                }
            })
            .buffered(PARALLEL_FETCHES)
            .collect()
            .await;

        for batch in expanded.into_iter().flatten() {
            articles.extend(batch);
        }

        info!(count = articles.len(), "traversal complete");
        Ok(articles)
    }

    async fn fetch_document(&self, url: &str) -> Result<ParsedDocument> {
        let content = self.fetcher.fetch_text(url).await?;
        parse(&content, self.parsing_method)
    }
}

impl Default for SitemapCrawler {
    fn default() -> Self {
        Self::new()
    }
}

/// `Sitemap: <url>` lines from robots.txt, in file order. The prefix is
/// the sitemap protocol's declared-entry-point convention.
fn sitemap_urls(robots: &str) -> impl Iterator<Item = &str> {
    robots
        .lines()
        .filter_map(|line| line.strip_prefix("Sitemap: "))
        .map(str::trim)
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sitemap_urls_follow_file_order() {
        let robots = "User-agent: *\n\
                      Disallow: /private\n\
                      Sitemap: https://example.com/news.xml\n\
                      sitemap: https://example.com/lowercase-ignored.xml\n\
                      Sitemap: https://example.com/archive.xml\n";

        let urls: Vec<&str> = sitemap_urls(robots).collect();
        assert_eq!(
            urls,
            [
                "https://example.com/news.xml",
                "https://example.com/archive.xml"
            ]
        );
    }

    #[test]
    fn sitemap_urls_skip_empty_values() {
        assert_eq!(sitemap_urls("Sitemap:  \n").count(), 0);
    }
}

use crate::dates::{parse_timestamp, TimeWindow};
use crate::parse::ParsedDocument;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, warn};

/// A news article reference selected from a url set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub url: String,
    pub dt: NaiveDateTime,
}

/// A sub-sitemap reference selected from a sitemap index, queued for the
/// second traversal pass. Same shape as [`Article`], different meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapRef {
    pub url: String,
    pub dt: NaiveDateTime,
}

/// What kind of sitemap document a parse produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// `<sitemapindex>`: entries point at other sitemaps.
    Index,
    /// `<urlset>`: entries point at articles.
    UrlSet,
    /// Anything else; the caller skips it.
    Unknown,
}

/// Classify a parsed document by its root element's local name.
pub fn classify(doc: &ParsedDocument) -> SitemapKind {
    match doc.root_name() {
        "sitemapindex" => SitemapKind::Index,
        "urlset" => SitemapKind::UrlSet,
        _ => SitemapKind::Unknown,
    }
}

/// Select in-window sub-sitemap references from a sitemap index.
///
/// Entries without a `lastmod` cannot be time-filtered and are dropped.
/// Timestamp parse failures skip the entry with a diagnostic; the rest of
/// the document is still processed.
pub fn sitemap_refs(
    doc: &ParsedDocument,
    window: &TimeWindow,
    strip_timezone: bool,
) -> Vec<SitemapRef> {
    let mut refs = Vec::new();
    for entry in doc.elements("sitemap") {
        let Some(url) = entry.text_of("loc") else {
            debug!("sitemap entry without <loc>, skipping");
            continue;
        };
        if let Some(dt) = entry_timestamp(url, entry.text_of("lastmod"), strip_timezone) {
            if window.contains(dt) {
                refs.push(SitemapRef {
                    url: url.to_string(),
                    dt,
                });
            }
        }
    }
    refs
}

/// Select in-window article references from a url set.
///
/// The news-specific `news:news/news:publication_date` is preferred over
/// `lastmod`; entries carrying neither are dropped. Error isolation is
/// per entry, as for [`sitemap_refs`].
pub fn article_refs(
    doc: &ParsedDocument,
    window: &TimeWindow,
    strip_timezone: bool,
) -> Vec<Article> {
    let mut articles = Vec::new();
    for entry in doc.elements("url") {
        let Some(url) = entry.text_of("loc") else {
            debug!("url entry without <loc>, skipping");
            continue;
        };
        // only dates under <news:news> count as publication dates;
        // other extensions (video, image) carry their own date elements
        let raw = entry
            .descendants("news")
            .into_iter()
            .find_map(|news| news.text_of("publication_date"))
            .or_else(|| entry.text_of("lastmod"));
        if let Some(dt) = entry_timestamp(url, raw, strip_timezone) {
            if window.contains(dt) {
                articles.push(Article {
                    url: url.to_string(),
                    dt,
                });
            }
        }
    }
    articles
}

/// Parse an entry's selected timestamp. `None` means the entry has no
/// date to filter on, or its date would not parse; either way it is
/// excluded, never emitted dateless.
fn entry_timestamp(url: &str, raw: Option<&str>, strip_timezone: bool) -> Option<NaiveDateTime> {
    let Some(raw) = raw else {
        debug!(url, "entry has no usable timestamp, skipping");
        return None;
    };
    match parse_timestamp(raw, strip_timezone) {
        Ok(dt) => Some(dt),
        Err(e) => {
            warn!(url, error = %e, "skipping entry");
            None
        }
    }
}

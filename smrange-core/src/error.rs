use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unparseable timestamp: {0}")]
    DateFormat(String),
}

pub type Result<T> = std::result::Result<T, SitemapError>;

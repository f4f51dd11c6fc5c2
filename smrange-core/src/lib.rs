pub mod crawler;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod sitemap;

pub use crawler::SitemapCrawler;
pub use dates::TimeWindow;
pub use error::SitemapError;
pub use parse::ParsingMethod;
pub use sitemap::{Article, SitemapRef};

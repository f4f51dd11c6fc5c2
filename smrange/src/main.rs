use colored::Colorize;
use commands::command_argument_builder;
use smrange::handlers;
use smrange_core::{ParsingMethod, SitemapCrawler};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let matches = cmd.get_matches();

    // Diagnostics go to stderr so they never mix with the report on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let site = matches.get_one::<Url>("site").expect("site is required");
    if !matches!(site.scheme(), "http" | "https") {
        eprintln!(
            "{} site URL must start with http:// or https://",
            "✗".red()
        );
        std::process::exit(2);
    }

    let daysago = *matches.get_one::<i64>("daysago").expect("has default");
    let start = matches.get_one::<String>("start").map(String::as_str);
    let end = matches.get_one::<String>("end").map(String::as_str);
    let window = match handlers::resolve_window(daysago, start, end) {
        Ok(window) => window,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(2);
        }
    };

    let parsing_method = if matches.get_flag("lenient") {
        ParsingMethod::Lenient
    } else {
        ParsingMethod::Strict
    };
    let timeout = *matches.get_one::<u64>("timeout").expect("has default");

    let crawler = SitemapCrawler::with_timeout(timeout)
        .with_parsing_method(parsing_method)
        .with_strip_timezone(matches.get_flag("notz"));

    info!(site = %site, start = %window.start, end = %window.end, "starting extraction");
    let start_time = std::time::Instant::now();

    let articles = match crawler.collect_articles(site.as_str(), &window).await {
        Ok(articles) => articles,
        Err(e) => {
            eprintln!("{} Extraction failed: {}", "✗".red(), e);
            std::process::exit(1);
        }
    };
    info!(
        count = articles.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "extraction complete"
    );

    let format = matches.get_one::<String>("format").expect("has default");
    let report = match format.as_str() {
        "xml" => handlers::render_xml(&articles),
        _ => handlers::render_json(&articles),
    };
    let report = match report {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} Failed to render report: {}", "✗".red(), e);
            std::process::exit(1);
        }
    };

    let output = matches.get_one::<std::path::PathBuf>("output");
    if let Err(e) = handlers::write_report(&report, output) {
        eprintln!("{} {}", "✗".red(), e);
        std::process::exit(1);
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

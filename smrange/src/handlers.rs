use chrono::{Duration, Local, NaiveDateTime};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use smrange_core::dates::parse_timestamp;
use smrange_core::{Article, TimeWindow};
use std::fs;
use std::path::PathBuf;

// Helper functions for the extraction run

/// Build the selection window from either explicit `--start`/`--end`
/// bounds or a `--daysago` offset from now.
pub fn resolve_window(
    daysago: i64,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<TimeWindow, String> {
    match (start, end) {
        (Some(start), Some(end)) => {
            let start = parse_bound(start)?;
            let end = parse_bound(end)?;
            if end < start {
                return Err(format!("--end ({end}) is before --start ({start})"));
            }
            Ok(TimeWindow::new(start, end))
        }
        (None, None) => {
            if daysago < 0 {
                return Err("--daysago must not be negative".to_string());
            }
            let end = Local::now().naive_local();
            let start = end - Duration::days(daysago);
            Ok(TimeWindow::new(start, end))
        }
        _ => Err("--start and --end must be given together".to_string()),
    }
}

fn parse_bound(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw, true).map_err(|e| e.to_string())
}

/// Pretty-printed JSON array of `{ "url": ..., "dt": ... }` objects.
pub fn render_json(articles: &[Article]) -> Result<String, String> {
    serde_json::to_string_pretty(articles).map_err(|e| e.to_string())
}

/// `<articles><article url=".." dt=".."/></articles>` document.
pub fn render_xml(articles: &[Article]) -> Result<String, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Start(BytesStart::new("articles")))
        .map_err(|e| e.to_string())?;
    for article in articles {
        let mut el = BytesStart::new("article");
        el.push_attribute(("url", article.url.as_str()));
        let dt = article.dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string();
        el.push_attribute(("dt", dt.as_str()));
        writer
            .write_event(Event::Empty(el))
            .map_err(|e| e.to_string())?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("articles")))
        .map_err(|e| e.to_string())?;

    String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())
}

/// Write the rendered report to a file, or stdout when no path is given.
/// Diagnostics go to stderr via tracing; this is the only data output.
pub fn write_report(report: &str, output: Option<&PathBuf>) -> Result<(), String> {
    match output {
        Some(path) => fs::write(path, report)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e)),
        None => {
            println!("{report}");
            Ok(())
        }
    }
}

use chrono::{Duration, NaiveDateTime};
use smrange::handlers::*;
use smrange_core::Article;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn dt(s: &str) -> NaiveDateTime {
    s.parse().unwrap()
}

fn sample_articles() -> Vec<Article> {
    vec![
        Article {
            url: "https://example.com/a?id=1&lang=en".to_string(),
            dt: dt("2024-01-05T10:00:00"),
        },
        Article {
            url: "https://example.com/b".to_string(),
            dt: dt("2024-01-06T08:30:00"),
        },
    ]
}

#[test]
fn test_resolve_window_explicit_bounds() {
    let window = resolve_window(2, Some("2024-01-01T00:00:00"), Some("2024-01-10")).unwrap();
    assert_eq!(window.start, dt("2024-01-01T00:00:00"));
    assert_eq!(window.end, dt("2024-01-10T00:00:00"));
}

#[test]
fn test_resolve_window_equal_bounds_allowed() {
    let window = resolve_window(2, Some("2024-01-01"), Some("2024-01-01")).unwrap();
    assert_eq!(window.start, window.end);
}

#[test]
fn test_resolve_window_end_before_start() {
    let result = resolve_window(2, Some("2024-01-10"), Some("2024-01-01"));
    assert!(result.is_err());
}

#[test]
fn test_resolve_window_half_specified() {
    let result = resolve_window(2, Some("2024-01-01"), None);
    assert!(result.unwrap_err().contains("together"));
}

#[test]
fn test_resolve_window_unparseable_bound() {
    let result = resolve_window(2, Some("last tuesday"), Some("2024-01-10"));
    assert!(result.is_err());
}

#[test]
fn test_resolve_window_daysago() {
    let window = resolve_window(3, None, None).unwrap();
    assert_eq!(window.end - window.start, Duration::days(3));
}

#[test]
fn test_resolve_window_negative_daysago() {
    let result = resolve_window(-1, None, None);
    assert!(result.is_err());
}

#[test]
fn test_render_json_shape() {
    let json = render_json(&sample_articles()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["url"], "https://example.com/a?id=1&lang=en");
    assert_eq!(arr[0]["dt"], "2024-01-05T10:00:00");
    assert_eq!(arr[1]["dt"], "2024-01-06T08:30:00");
}

#[test]
fn test_render_json_empty() {
    assert_eq!(render_json(&[]).unwrap(), "[]");
}

#[test]
fn test_render_xml_shape() {
    let xml = render_xml(&sample_articles()).unwrap();

    assert!(xml.starts_with("<articles>"));
    assert!(xml.ends_with("</articles>"));
    assert!(xml.contains(r#"dt="2024-01-05T10:00:00""#));
    assert!(xml.contains(r#"url="https://example.com/b""#));
    // ampersand in the url attribute must be escaped
    assert!(xml.contains("id=1&amp;lang=en"));
    assert_eq!(xml.matches("<article ").count(), 2);
}

#[test]
fn test_render_xml_empty() {
    let xml = render_xml(&[]).unwrap();
    assert!(xml.starts_with("<articles>"));
    assert!(xml.trim_end().ends_with("</articles>"));
    assert!(!xml.contains("<article "));
}

#[test]
fn test_write_report_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_file = NamedTempFile::new()?;
    let path = PathBuf::from(temp_file.path());

    write_report("[]", Some(&path)).map_err(|e| e.to_string())?;

    assert_eq!(std::fs::read_to_string(&path)?, "[]");
    Ok(())
}

#[test]
fn test_write_report_bad_path() {
    let path = PathBuf::from("/nonexistent-dir/report.json");
    let result = write_report("[]", Some(&path));
    assert!(result.unwrap_err().contains("Failed to write"));
}

mod common;

use chrono::{TimeZone, Utc};
use common::init_tracing;
use search_aggregator::types::{Query, Report, SearchItem, SourceOutcome};
use search_aggregator::{notification_summary, render_report};
use uuid::Uuid;

fn item(title: &str, url: &str) -> SearchItem {
    SearchItem {
        title: title.to_string(),
        url: url.to_string(),
        description: "Something happened".to_string(),
        published_at: Some(Utc.with_ymd_and_hms(2024, 4, 30, 9, 0, 0).unwrap()),
        author: Some("Reporter".to_string()),
        source_name: Some("wire".to_string()),
    }
}

fn sample_report() -> Report {
    let query = Query::new("ai news").unwrap();
    let mut report = Report::new(&query);
    report.run_id = Uuid::nil();
    report.timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    report.absorb(SourceOutcome::success(
        "brave",
        "Brave Search",
        vec![
            item("Tokio", "https://tokio.rs/"),
            item("Async book", "https://rust-lang.github.io/async-book/"),
        ],
    ));
    report.absorb(SourceOutcome::failure(
        "newsapi",
        "NewsAPI",
        "Rate limit exceeded",
        Some(429),
    ));
    report
}

#[test]
fn render_is_deterministic() {
    init_tracing();

    let report = sample_report();
    let first = render_report(&report, 5);
    let second = render_report(&report, 5);
    assert_eq!(first, second);
}

#[test]
fn render_shows_sources_items_and_errors() {
    init_tracing();

    let rendered = render_report(&sample_report(), 5);

    assert!(rendered.contains("# Search results for \"ai news\""));
    assert!(rendered.contains("2024-05-01 12:00:00 UTC"));
    assert!(rendered.contains("## Brave Search (2 results)"));
    assert!(rendered.contains("1. Tokio"));
    assert!(rendered.contains("https://tokio.rs/"));
    assert!(rendered.contains("2024-04-30 · Reporter · wire"));
    assert!(rendered.contains("## Errors"));
    assert!(rendered.contains("- newsapi: Rate limit exceeded"));
}

#[test]
fn render_caps_items_per_source() {
    init_tracing();

    let query = Query::new("ai news").unwrap();
    let mut report = Report::new(&query);
    let items: Vec<SearchItem> = (0..7)
        .map(|i| item(&format!("Item {}", i + 1), "https://example.com/"))
        .collect();
    report.absorb(SourceOutcome::success("brave", "Brave Search", items));

    let rendered = render_report(&report, 5);

    assert!(rendered.contains("5. Item 5"));
    assert!(!rendered.contains("6. Item 6"));
    assert!(rendered.contains("(2 more not shown)"));
}

#[test]
fn render_total_failure_is_distinct() {
    init_tracing();

    let query = Query::new("ai news").unwrap();
    let mut report = Report::new(&query);
    report.absorb(SourceOutcome::failure(
        "brave",
        "Brave Search",
        "Invalid API key",
        Some(401),
    ));
    report.absorb(SourceOutcome::failure(
        "newsapi",
        "NewsAPI",
        "Rate limit exceeded",
        Some(429),
    ));

    let rendered = render_report(&report, 5);

    assert!(rendered.contains("No sources returned results."));
    assert!(rendered.contains("- brave: Invalid API key"));
    assert!(rendered.contains("- newsapi: Rate limit exceeded"));
}

#[test]
fn notification_summary_counts_successes() {
    init_tracing();

    let summary = notification_summary(&sample_report());
    assert_eq!(summary, "2 results from 1 sources for \"ai news\"");
}

#[test]
fn notification_summary_reports_total_failure() {
    init_tracing();

    let query = Query::new("ai news").unwrap();
    let mut report = Report::new(&query);
    report.absorb(SourceOutcome::failure("brave", "Brave Search", "boom", None));

    let summary = notification_summary(&report);
    assert!(summary.contains("failed"));
    assert!(summary.contains("1 errors"));
}

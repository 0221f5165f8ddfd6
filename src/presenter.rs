use crate::types::Report;

/// Render a report as readable markdown-ish text.
///
/// Pure function: identical reports render to byte-identical strings, so
/// output can be golden-tested. Successful sources come first (one section
/// each, at most `max_items_per_source` items), failures last.
pub fn render_report(report: &Report, max_items_per_source: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Search results for \"{}\"\n\n", report.query));
    out.push_str(&format!(
        "{} · {} results from {} of {} sources\n",
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        report.total_results,
        report.succeeded_sources(),
        report.succeeded_sources() + report.errors.len()
    ));

    if report.is_total_failure() {
        out.push_str("\nNo sources returned results.\n");
    }

    for outcome in report.outcomes.values() {
        out.push_str(&format!(
            "\n## {} ({} results)\n",
            outcome.source_name, outcome.result_count
        ));

        for (index, item) in outcome.items.iter().take(max_items_per_source).enumerate() {
            out.push_str(&format!("\n{}. {}\n", index + 1, item.title));
            if !item.url.is_empty() {
                out.push_str(&format!("   {}\n", item.url));
            }
            if !item.description.is_empty() {
                out.push_str(&format!("   {}\n", item.description));
            }

            let mut meta = Vec::new();
            if let Some(published) = item.published_at {
                meta.push(published.format("%Y-%m-%d").to_string());
            }
            if let Some(author) = &item.author {
                meta.push(author.clone());
            }
            if let Some(source) = &item.source_name {
                meta.push(source.clone());
            }
            if !meta.is_empty() {
                out.push_str(&format!("   {}\n", meta.join(" · ")));
            }
        }

        let hidden = outcome.items.len().saturating_sub(max_items_per_source);
        if hidden > 0 {
            out.push_str(&format!("\n({} more not shown)\n", hidden));
        }
    }

    if !report.errors.is_empty() {
        out.push_str("\n## Errors\n\n");
        for error in &report.errors {
            out.push_str(&format!("- {}: {}\n", error.source_id, error.message));
        }
    }

    out
}

/// One-line summary for the OS notification: success count and totals, or
/// the distinct total-failure message.
pub fn notification_summary(report: &Report) -> String {
    if report.is_total_failure() {
        format!(
            "Search for \"{}\" failed: no sources returned results ({} errors)",
            report.query,
            report.errors.len()
        )
    } else {
        format!(
            "{} results from {} sources for \"{}\"",
            report.total_results,
            report.succeeded_sources(),
            report.query
        )
    }
}

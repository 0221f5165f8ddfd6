use anyhow::{bail, Context};
use clap::Parser;
use search_aggregator::{
    notification_summary, render_report, AppConfig, ConfigOverrides, DesktopHost, FetchJson,
    HostIo, HttpFetcher, Query, SearchAggregator,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Query search and news APIs and merge the results into one report.
#[derive(Parser, Debug)]
#[command(name = "search-aggregator", version, about)]
struct Cli {
    /// Query words; the clipboard is read when omitted
    query: Vec<String>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    config: bool,

    /// Comma-separated source list (brave,newsapi,newsdata,google)
    #[arg(long, value_delimiter = ',')]
    sources: Option<Vec<String>>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Attempts per request, the first call included
    #[arg(long)]
    retries: Option<u32>,

    /// Maximum results requested per source
    #[arg(long)]
    max_results: Option<usize>,

    /// Run sources one at a time instead of concurrently
    #[arg(long)]
    sequential: bool,

    /// Skip copying the report to the clipboard
    #[arg(long)]
    no_clipboard: bool,

    /// Skip the desktop notification
    #[arg(long)]
    no_notify: bool,

    /// Brave Search API key (overrides keyring and environment)
    #[arg(long, value_name = "KEY")]
    brave_key: Option<String>,

    /// NewsAPI key (overrides keyring and environment)
    #[arg(long, value_name = "KEY")]
    newsapi_key: Option<String>,

    /// Newsdata.io key (overrides keyring and environment)
    #[arg(long, value_name = "KEY")]
    newsdata_key: Option<String>,

    /// Google Custom Search key (overrides keyring and environment)
    #[arg(long, value_name = "KEY")]
    google_key: Option<String>,

    /// Google Custom Search engine id (cx)
    #[arg(long, value_name = "ID")]
    google_cx: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let host = DesktopHost::new();

    let overrides = ConfigOverrides {
        timeout_ms: cli.timeout_ms,
        max_attempts: cli.retries,
        max_results: cli.max_results,
        sources: cli.sources,
        sequential: cli.sequential,
        no_clipboard: cli.no_clipboard,
        no_notify: cli.no_notify,
        brave_key: cli.brave_key,
        newsapi_key: cli.newsapi_key,
        newsdata_key: cli.newsdata_key,
        google_key: cli.google_key,
        google_engine_id: cli.google_cx,
    };

    let config = AppConfig::load(&host, &overrides);

    if cli.config {
        println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    if config.enabled_sources.is_empty() {
        bail!(
            "No sources configured; set BRAVE_API_KEY, NEWSAPI_API_KEY, \
             NEWSDATA_API_KEY or GOOGLE_API_KEY"
        );
    }

    let raw_query = if cli.query.is_empty() {
        info!("No query argument, reading the clipboard");
        host.read_clipboard()
            .context("Cannot read a query from the clipboard")?
    } else {
        cli.query.join(" ")
    };

    let query = Query::new(&raw_query)?;

    let fetcher: Arc<dyn FetchJson> = Arc::new(HttpFetcher::new());
    let aggregator = SearchAggregator::from_config(&config, fetcher);
    let report = aggregator.run(&query).await;

    let rendered = render_report(&report, config.max_results_per_source);
    println!("{}", rendered);

    if config.copy_to_clipboard {
        if let Err(e) = host.write_clipboard(&rendered) {
            warn!("Could not copy the report to the clipboard: {}", e);
        }
    }

    if config.show_notifications {
        let summary = notification_summary(&report);
        if let Err(e) = host.notify("Search aggregator", &summary) {
            warn!("Could not show a notification: {}", e);
        }
    }

    // Partial or even total source failure is still a completed run; only
    // the setup problems above exit non-zero.
    Ok(())
}

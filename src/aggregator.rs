use crate::config::AppConfig;
use crate::sources::{
    BraveSource, GoogleSource, NewsApiSource, NewsdataSource, BRAVE_ID, GOOGLE_ID, NEWSAPI_ID,
    NEWSDATA_ID,
};
use crate::traits::{FetchJson, SearchSource};
use crate::types::{Query, Report, SchedulingMode, SourceOutcome};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// Fans a query out to the configured sources and merges every settled
/// outcome into one report.
///
/// Sources are arranged in fallback chains: within a chain the next source
/// runs only when the one before it failed or returned nothing. One chain's
/// failure never prevents another chain from being attempted.
pub struct SearchAggregator {
    chains: Vec<Vec<Arc<dyn SearchSource>>>,
    scheduling: SchedulingMode,
}

impl SearchAggregator {
    pub fn new(scheduling: SchedulingMode) -> Self {
        Self {
            chains: Vec::new(),
            scheduling,
        }
    }

    /// Add a standalone source (a chain of one).
    pub fn add_source(&mut self, source: Arc<dyn SearchSource>) {
        self.chains.push(vec![source]);
    }

    /// Add a fallback chain in priority order.
    pub fn add_chain(&mut self, chain: Vec<Arc<dyn SearchSource>>) {
        if !chain.is_empty() {
            self.chains.push(chain);
        }
    }

    /// Wire the standard source set: Brave, NewsAPI with Newsdata.io as its
    /// fallback, and Google. When NewsAPI is not enabled the fallback runs
    /// as its own chain.
    pub fn from_config(config: &AppConfig, fetcher: Arc<dyn FetchJson>) -> Self {
        let mut aggregator = Self::new(config.scheduling);
        let enabled = |id: &str| config.enabled_sources.iter().any(|s| s == id);

        if enabled(BRAVE_ID) {
            aggregator.add_source(Arc::new(BraveSource::new(
                config.sources.brave.clone(),
                fetcher.clone(),
            )));
        }

        let mut news_chain: Vec<Arc<dyn SearchSource>> = Vec::new();
        if enabled(NEWSAPI_ID) {
            news_chain.push(Arc::new(NewsApiSource::new(
                config.sources.newsapi.clone(),
                fetcher.clone(),
            )));
        }
        if enabled(NEWSDATA_ID) {
            news_chain.push(Arc::new(NewsdataSource::new(
                config.sources.newsdata.clone(),
                fetcher.clone(),
            )));
        }
        aggregator.add_chain(news_chain);

        if enabled(GOOGLE_ID) {
            aggregator.add_source(Arc::new(GoogleSource::new(
                config.sources.google.clone(),
                fetcher.clone(),
            )));
        }

        aggregator
    }

    pub fn source_count(&self) -> usize {
        self.chains.iter().map(|chain| chain.len()).sum()
    }

    /// Run the query against every chain and merge the outcomes.
    ///
    /// Never fails: each attempted source settles into either
    /// `Report.outcomes` or `Report.errors`, and an all-fail run still
    /// produces a normal report with `total_results == 0`.
    pub async fn run(&self, query: &Query) -> Report {
        info!(
            "Running query \"{}\" across {} configured sources",
            query,
            self.source_count()
        );

        let mut report = Report::new(query);

        let settled: Vec<Vec<SourceOutcome>> = match self.scheduling {
            SchedulingMode::Parallel => {
                join_all(self.chains.iter().map(|chain| run_chain(chain, query))).await
            }
            SchedulingMode::Sequential => {
                let mut all = Vec::with_capacity(self.chains.len());
                for chain in &self.chains {
                    all.push(run_chain(chain, query).await);
                }
                all
            }
        };

        for outcome in settled.into_iter().flatten() {
            if let Some(error) = &outcome.error {
                warn!("Source {} failed: {}", outcome.source_id, error);
            }
            report.absorb(outcome);
        }

        info!(
            "Run {} finished: {} results from {} sources, {} failures",
            report.run_id,
            report.total_results,
            report.succeeded_sources(),
            report.errors.len()
        );
        report
    }
}

/// Run one fallback chain sequentially, stopping at the first source that
/// succeeds with at least one item. Every attempted outcome is returned so
/// the report shows the fallback trail.
async fn run_chain(chain: &[Arc<dyn SearchSource>], query: &Query) -> Vec<SourceOutcome> {
    let mut outcomes = Vec::with_capacity(chain.len());

    for (position, source) in chain.iter().enumerate() {
        if position > 0 {
            info!("Falling back to {} for \"{}\"", source.source_id(), query);
        }

        let outcome = source.search(query).await;
        let usable = outcome.success && outcome.result_count > 0;
        outcomes.push(outcome);

        if usable {
            break;
        }
    }

    outcomes
}

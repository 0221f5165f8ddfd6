use crate::types::{Query, Result, SourceOutcome};
use async_trait::async_trait;

/// Trait for querying one external search/news API.
///
/// `search` never returns Err: every failure (missing key, bad query,
/// transport, payload) is folded into a failed `SourceOutcome` so the
/// aggregator always has something to report.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Stable identifier used as the outcome key ("brave", "newsapi", ...)
    fn source_id(&self) -> &str;

    /// Human-readable name for report headings
    fn source_name(&self) -> &str;

    /// Whether this source has the configuration it needs to be attempted
    fn is_configured(&self) -> bool;

    /// Run one search against the source
    async fn search(&self, query: &Query) -> SourceOutcome;
}

/// One HTTP GET returning parsed JSON, with a per-request timeout.
///
/// Implemented over reqwest for real runs; tests substitute mocks that
/// count calls and script responses.
#[async_trait]
pub trait FetchJson: Send + Sync {
    async fn fetch_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout_ms: u64,
    ) -> Result<serde_json::Value>;
}

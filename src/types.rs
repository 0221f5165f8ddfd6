use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Sentinel title used when a source payload carries no title at all.
pub const NO_TITLE: &str = "No title";

/// A validated search query: trimmed, non-empty, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query(String);

impl Query {
    pub const MIN_LEN: usize = 2;
    pub const MAX_LEN: usize = 200;

    /// Build a query from raw input: trim, reject too-short input, truncate
    /// overlong input at a word boundary.
    pub fn new(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.len() < Self::MIN_LEN {
            return Err(AggregatorError::Validation(format!(
                "query must be at least {} characters",
                Self::MIN_LEN
            )));
        }
        Ok(Self(truncate_at_word_boundary(trimmed, Self::MAX_LEN)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Truncate to at most `max` bytes, preferring the last space in the upper
/// quarter of the budget so words are not cut mid-way.
fn truncate_at_word_boundary(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }

    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }

    let truncated = &text[..cut];
    let min_cut = max * 3 / 4;
    match truncated.rfind(' ') {
        Some(pos) if pos >= min_cut => truncated[..pos].trim_end().to_string(),
        _ => truncated.to_string(),
    }
}

/// Per-source request configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// API key; empty means the source is not configured and must be skipped.
    pub api_key: String,
    pub base_url: String,
    pub timeout_ms: u64,
    /// Total request attempts, the first call included.
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    /// Requested result count; each adapter clamps this to its API's maximum.
    pub max_results: usize,
    /// Google Custom Search engine id (`cx`); unused by the other sources.
    pub engine_id: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: String::new(),
            timeout_ms: 10_000,
            max_attempts: 3,
            retry_delay_ms: 500,
            max_results: 5,
            engine_id: None,
        }
    }
}

impl SourceConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// One normalized result, regardless of which API produced it.
///
/// The first three fields always carry a value (sentinel defaults) so the
/// presenter never needs null-checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub title: String,
    pub url: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub source_name: Option<String>,
}

impl Default for SearchItem {
    fn default() -> Self {
        Self {
            title: NO_TITLE.to_string(),
            url: String::new(),
            description: String::new(),
            published_at: None,
            author: None,
            source_name: None,
        }
    }
}

/// The per-source result of one run: either items or an error message.
/// Never mutated after the adapter returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOutcome {
    pub source_id: String,
    pub source_name: String,
    pub success: bool,
    pub items: Vec<SearchItem>,
    pub result_count: usize,
    pub error: Option<String>,
    pub error_code: Option<u16>,
}

impl SourceOutcome {
    pub fn success(source_id: &str, source_name: &str, items: Vec<SearchItem>) -> Self {
        let result_count = items.len();
        Self {
            source_id: source_id.to_string(),
            source_name: source_name.to_string(),
            success: true,
            items,
            result_count,
            error: None,
            error_code: None,
        }
    }

    pub fn failure(
        source_id: &str,
        source_name: &str,
        error: impl Into<String>,
        error_code: Option<u16>,
    ) -> Self {
        Self {
            source_id: source_id.to_string(),
            source_name: source_name.to_string(),
            success: false,
            items: Vec::new(),
            result_count: 0,
            error: Some(error.into()),
            error_code,
        }
    }
}

/// A failed source attempt as recorded on the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceError {
    pub source_id: String,
    pub message: String,
}

/// The merged result of one aggregator run.
///
/// `outcomes` holds successes only, keyed by source id; failed attempts land
/// in `errors`. The BTreeMap keeps iteration order deterministic for
/// rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub run_id: Uuid,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub outcomes: BTreeMap<String, SourceOutcome>,
    pub errors: Vec<SourceError>,
    pub total_results: usize,
}

impl Report {
    pub fn new(query: &Query) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            query: query.as_str().to_string(),
            timestamp: Utc::now(),
            outcomes: BTreeMap::new(),
            errors: Vec::new(),
            total_results: 0,
        }
    }

    /// Fold one settled outcome into the report.
    pub fn absorb(&mut self, outcome: SourceOutcome) {
        if outcome.success {
            self.total_results += outcome.result_count;
            self.outcomes.insert(outcome.source_id.clone(), outcome);
        } else {
            self.errors.push(SourceError {
                source_id: outcome.source_id.clone(),
                message: outcome
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
    }

    pub fn succeeded_sources(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_total_failure(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// How the aggregator schedules its sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingMode {
    /// All chains launched concurrently; lowest wall-clock latency.
    Parallel,
    /// Chains run one at a time in source order; bounded peak load.
    Sequential,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Transport { message: String, code: Option<u16> },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid query: {0}")]
    Validation(String),

    #[error("unexpected payload: {0}")]
    Payload(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

impl AggregatorError {
    /// HTTP status behind this error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AggregatorError::Transport { code, .. } => *code,
            AggregatorError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;

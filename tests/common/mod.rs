#![allow(dead_code)] // each test binary uses its own subset of these helpers

use async_trait::async_trait;
use search_aggregator::sources::{brave, google, newsapi, newsdata};
use search_aggregator::types::{AggregatorError, Result, SchedulingMode, SourceConfig};
use search_aggregator::{AppConfig, FetchJson, HostIo, SourcesConfig};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

enum MockResponse {
    Json(Value),
    Status(u16),
}

/// Scripted fetcher: responds by URL fragment and counts every call.
pub struct MockFetcher {
    rules: Vec<(String, MockResponse)>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_json(mut self, url_fragment: &str, payload: Value) -> Self {
        self.rules
            .push((url_fragment.to_string(), MockResponse::Json(payload)));
        self
    }

    pub fn with_status(mut self, url_fragment: &str, status: u16) -> Self {
        self.rules
            .push((url_fragment.to_string(), MockResponse::Status(status)));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchJson for MockFetcher {
    async fn fetch_json(
        &self,
        url: &str,
        _headers: &[(String, String)],
        _timeout_ms: u64,
    ) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        for (fragment, response) in &self.rules {
            if url.contains(fragment.as_str()) {
                return match response {
                    MockResponse::Json(payload) => Ok(payload.clone()),
                    MockResponse::Status(code) => Err(AggregatorError::Transport {
                        message: format!("HTTP {}", code),
                        code: Some(*code),
                    }),
                };
            }
        }

        Err(AggregatorError::General(format!(
            "no scripted response for {}",
            url
        )))
    }
}

/// In-memory host: canned clipboard and credentials, no real I/O.
pub struct MemoryHost {
    pub clipboard: String,
    pub credentials: HashMap<String, String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            clipboard: String::new(),
            credentials: HashMap::new(),
        }
    }

    pub fn with_credential(mut self, name: &str, value: &str) -> Self {
        self.credentials.insert(name.to_string(), value.to_string());
        self
    }
}

impl HostIo for MemoryHost {
    fn read_clipboard(&self) -> Result<String> {
        Ok(self.clipboard.clone())
    }

    fn write_clipboard(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn notify(&self, _title: &str, _body: &str) -> Result<()> {
        Ok(())
    }

    fn credential(&self, name: &str) -> Option<String> {
        self.credentials.get(name).cloned()
    }
}

pub fn source_config(api_key: &str, base_url: &str) -> SourceConfig {
    SourceConfig {
        api_key: api_key.to_string(),
        base_url: base_url.to_string(),
        timeout_ms: 1_000,
        max_attempts: 1,
        retry_delay_ms: 10,
        max_results: 5,
        engine_id: None,
    }
}

/// A config with every key set and retries disabled, so tests control
/// behavior entirely through the scripted fetcher.
pub fn test_config(enabled: &[&str]) -> AppConfig {
    AppConfig {
        timeout_ms: 1_000,
        max_attempts: 1,
        max_results_per_source: 5,
        enabled_sources: enabled.iter().map(|s| s.to_string()).collect(),
        scheduling: SchedulingMode::Parallel,
        copy_to_clipboard: false,
        show_notifications: false,
        sources: SourcesConfig {
            brave: source_config("test-key", brave::DEFAULT_BASE_URL),
            newsapi: source_config("test-key", newsapi::DEFAULT_BASE_URL),
            newsdata: source_config("test-key", newsdata::DEFAULT_BASE_URL),
            google: SourceConfig {
                engine_id: Some("test-cx".to_string()),
                ..source_config("test-key", google::DEFAULT_BASE_URL)
            },
        },
    }
}

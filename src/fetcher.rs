use crate::traits::FetchJson;
use crate::types::{AggregatorError, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_USER_AGENT: &str = "search-aggregator/0.1";

/// Run `attempt` up to `max_attempts` times with exponential backoff between
/// tries. The first attempt fires immediately; the delay before attempt k
/// doubles each time (jittered, capped at 10s). The last error propagates
/// once the budget is exhausted.
pub async fn with_retry<T, F, Fut>(
    max_attempts: u32,
    base_delay: Duration,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
        current_interval: base_delay,
        initial_interval: base_delay,
        max_interval: Duration::from_secs(10),
        multiplier: 2.0,
        max_elapsed_time: None,
        ..Default::default()
    };

    let max_attempts = max_attempts.max(1);
    let mut last_error = None;

    for attempt_no in 1..=max_attempts {
        match attempt().await {
            Ok(value) => {
                if attempt_no > 1 {
                    debug!("Attempt {} succeeded", attempt_no);
                }
                return Ok(value);
            }
            Err(e) => {
                if attempt_no < max_attempts {
                    if let Some(delay) = backoff.next_backoff() {
                        warn!(
                            "Attempt {}/{} failed ({}), retrying in {:?}",
                            attempt_no, max_attempts, e, delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| AggregatorError::General("retry budget exhausted".to_string())))
}

/// HTTP fetcher over a shared reqwest client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchJson for HttpFetcher {
    async fn fetch_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout_ms: u64,
    ) -> Result<serde_json::Value> {
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(url)
            .timeout(Duration::from_millis(timeout_ms));
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AggregatorError::Transport {
                message: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
                code: Some(status.as_u16()),
            });
        }

        let payload = response.json().await?;
        Ok(payload)
    }
}

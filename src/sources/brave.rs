use crate::fetcher::with_retry;
use crate::sources::{describe_fetch_error, parse_publish_date, urlencode, BRAVE_ID};
use crate::traits::{FetchJson, SearchSource};
use crate::types::{Query, SearchItem, SourceConfig, SourceOutcome, NO_TITLE};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://api.search.brave.com/res/v1/web/search";
/// Documented maximum for the `count` parameter.
pub const MAX_COUNT: usize = 20;

const SOURCE_NAME: &str = "Brave Search";

/// Adapter for the Brave Search web API.
pub struct BraveSource {
    config: SourceConfig,
    fetcher: Arc<dyn FetchJson>,
}

impl BraveSource {
    pub fn new(config: SourceConfig, fetcher: Arc<dyn FetchJson>) -> Self {
        Self { config, fetcher }
    }

    fn request_url(&self, query: &Query) -> String {
        let count = self.config.max_results.clamp(1, MAX_COUNT);
        format!(
            "{}?q={}&count={}",
            self.config.base_url,
            urlencode(query.as_str()),
            count
        )
    }

    fn parse_payload(&self, payload: serde_json::Value) -> SourceOutcome {
        let parsed: BraveResponse = match serde_json::from_value(payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                return SourceOutcome::failure(
                    BRAVE_ID,
                    SOURCE_NAME,
                    format!("Unexpected Brave Search response: {}", e),
                    None,
                )
            }
        };

        let items: Vec<SearchItem> = parsed
            .web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .take(self.config.max_results)
            .map(|r| SearchItem {
                title: r
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| NO_TITLE.to_string()),
                url: r.url.unwrap_or_default(),
                description: r.description.unwrap_or_default(),
                published_at: r.page_age.as_deref().and_then(parse_publish_date),
                author: None,
                source_name: r.profile.and_then(|p| p.name),
            })
            .collect();

        info!("Brave Search returned {} results", items.len());
        SourceOutcome::success(BRAVE_ID, SOURCE_NAME, items)
    }
}

#[async_trait]
impl SearchSource for BraveSource {
    fn source_id(&self) -> &str {
        BRAVE_ID
    }

    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn search(&self, query: &Query) -> SourceOutcome {
        if !self.is_configured() {
            return SourceOutcome::failure(
                BRAVE_ID,
                SOURCE_NAME,
                "Brave Search API key not configured",
                None,
            );
        }
        if query.as_str().trim().is_empty() {
            return SourceOutcome::failure(BRAVE_ID, SOURCE_NAME, "Query must not be empty", None);
        }

        let url = self.request_url(query);
        let headers = vec![
            (
                "X-Subscription-Token".to_string(),
                self.config.api_key.clone(),
            ),
            ("Accept".to_string(), "application/json".to_string()),
        ];

        let fetched = with_retry(
            self.config.max_attempts,
            Duration::from_millis(self.config.retry_delay_ms),
            || self.fetcher.fetch_json(&url, &headers, self.config.timeout_ms),
        )
        .await;

        match fetched {
            Ok(payload) => self.parse_payload(payload),
            Err(e) => {
                let (message, code) = describe_fetch_error(&e);
                SourceOutcome::failure(BRAVE_ID, SOURCE_NAME, message, code)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct BraveResponse {
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    page_age: Option<String>,
    profile: Option<BraveProfile>,
}

#[derive(Debug, Deserialize)]
struct BraveProfile {
    name: Option<String>,
}

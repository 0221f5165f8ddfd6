use crate::fetcher::with_retry;
use crate::sources::{describe_fetch_error, parse_publish_date, urlencode, GOOGLE_ID};
use crate::traits::{FetchJson, SearchSource};
use crate::types::{Query, SearchItem, SourceConfig, SourceOutcome, NO_TITLE};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";
/// Documented maximum for the `num` parameter.
pub const MAX_NUM: usize = 10;

const SOURCE_NAME: &str = "Google Search";

/// Adapter for the Google Custom Search JSON API. Optional source; needs
/// both an API key and a search engine id (`cx`).
pub struct GoogleSource {
    config: SourceConfig,
    fetcher: Arc<dyn FetchJson>,
}

impl GoogleSource {
    pub fn new(config: SourceConfig, fetcher: Arc<dyn FetchJson>) -> Self {
        Self { config, fetcher }
    }

    fn request_url(&self, query: &Query, engine_id: &str) -> String {
        let num = self.config.max_results.clamp(1, MAX_NUM);
        format!(
            "{}?key={}&cx={}&q={}&num={}",
            self.config.base_url,
            urlencode(&self.config.api_key),
            urlencode(engine_id),
            urlencode(query.as_str()),
            num
        )
    }

    fn parse_payload(&self, payload: serde_json::Value) -> SourceOutcome {
        let parsed: GoogleResponse = match serde_json::from_value(payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                return SourceOutcome::failure(
                    GOOGLE_ID,
                    SOURCE_NAME,
                    format!("Unexpected Google Search response: {}", e),
                    None,
                )
            }
        };

        let items: Vec<SearchItem> = parsed
            .items
            .into_iter()
            .take(self.config.max_results)
            .map(|item| {
                let source_name = item
                    .link
                    .as_deref()
                    .and_then(|link| url::Url::parse(link).ok())
                    .and_then(|u| u.domain().map(|d| d.to_string()));
                let published_at = item
                    .pagemap
                    .as_ref()
                    .and_then(|p| p.metatags.first())
                    .and_then(|m| m.published_time.as_deref())
                    .and_then(parse_publish_date);

                SearchItem {
                    title: item
                        .title
                        .filter(|t| !t.is_empty())
                        .unwrap_or_else(|| NO_TITLE.to_string()),
                    url: item.link.unwrap_or_default(),
                    description: item.snippet.unwrap_or_default(),
                    published_at,
                    author: None,
                    source_name,
                }
            })
            .collect();

        info!("Google Search returned {} results", items.len());
        SourceOutcome::success(GOOGLE_ID, SOURCE_NAME, items)
    }
}

#[async_trait]
impl SearchSource for GoogleSource {
    fn source_id(&self) -> &str {
        GOOGLE_ID
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
                GOOGLE_ID,
                SOURCE_NAME,
                "Google Search API key not configured",
                None,
            );
        }
        let engine_id = match self.config.engine_id.as_deref() {
            Some(cx) if !cx.trim().is_empty() => cx.to_string(),
            _ => {
                return SourceOutcome::failure(
                    GOOGLE_ID,
                    SOURCE_NAME,
                    "Google Search engine ID not configured",
                    None,
                )
            }
        };
        if query.as_str().trim().is_empty() {
            return SourceOutcome::failure(GOOGLE_ID, SOURCE_NAME, "Query must not be empty", None);
        }

        let url = self.request_url(query, &engine_id);

        let fetched = with_retry(
            self.config.max_attempts,
            Duration::from_millis(self.config.retry_delay_ms),
            || self.fetcher.fetch_json(&url, &[], self.config.timeout_ms),
        )
        .await;

        match fetched {
            Ok(payload) => self.parse_payload(payload),
            Err(e) => {
                let (message, code) = describe_fetch_error(&e);
                SourceOutcome::failure(GOOGLE_ID, SOURCE_NAME, message, code)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    pagemap: Option<GooglePageMap>,
}

#[derive(Debug, Deserialize)]
struct GooglePageMap {
    #[serde(default)]
    metatags: Vec<GoogleMetaTags>,
}

#[derive(Debug, Deserialize)]
struct GoogleMetaTags {
    #[serde(rename = "article:published_time")]
    published_time: Option<String>,
}

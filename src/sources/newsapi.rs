use crate::fetcher::with_retry;
use crate::sources::{describe_fetch_error, parse_publish_date, urlencode, NEWSAPI_ID};
use crate::traits::{FetchJson, SearchSource};
use crate::types::{Query, SearchItem, SourceConfig, SourceOutcome, NO_TITLE};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/everything";
/// Documented maximum for the `pageSize` parameter.
pub const MAX_PAGE_SIZE: usize = 100;

const SOURCE_NAME: &str = "NewsAPI";

/// Adapter for the NewsAPI `everything` endpoint. Primary news source;
/// the aggregator falls back to Newsdata.io when this yields nothing.
pub struct NewsApiSource {
    config: SourceConfig,
    fetcher: Arc<dyn FetchJson>,
}

impl NewsApiSource {
    pub fn new(config: SourceConfig, fetcher: Arc<dyn FetchJson>) -> Self {
        Self { config, fetcher }
    }

    fn request_url(&self, query: &Query) -> String {
        let page_size = self.config.max_results.clamp(1, MAX_PAGE_SIZE);
        format!(
            "{}?q={}&pageSize={}&sortBy=publishedAt",
            self.config.base_url,
            urlencode(query.as_str()),
            page_size
        )
    }

    fn parse_payload(&self, payload: serde_json::Value) -> SourceOutcome {
        let parsed: NewsApiResponse = match serde_json::from_value(payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                return SourceOutcome::failure(
                    NEWSAPI_ID,
                    SOURCE_NAME,
                    format!("Unexpected NewsAPI response: {}", e),
                    None,
                )
            }
        };

        // NewsAPI signals application-level failure with HTTP 200 and
        // status != "ok"; retrying such a response would change nothing.
        if parsed.status != "ok" {
            let mut message = parsed
                .message
                .unwrap_or_else(|| format!("NewsAPI returned status {}", parsed.status));
            if let Some(code) = parsed.code {
                message = format!("{} ({})", message, code);
            }
            return SourceOutcome::failure(NEWSAPI_ID, SOURCE_NAME, message, None);
        }

        let items: Vec<SearchItem> = parsed
            .articles
            .into_iter()
            .take(self.config.max_results)
            .map(|a| SearchItem {
                title: a
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| NO_TITLE.to_string()),
                url: a.url.unwrap_or_default(),
                description: a.description.unwrap_or_default(),
                published_at: a.published_at.as_deref().and_then(parse_publish_date),
                author: a.author.filter(|a| !a.is_empty()),
                source_name: a.source.and_then(|s| s.name),
            })
            .collect();

        info!("NewsAPI returned {} articles", items.len());
        SourceOutcome::success(NEWSAPI_ID, SOURCE_NAME, items)
    }
}

#[async_trait]
impl SearchSource for NewsApiSource {
    fn source_id(&self) -> &str {
        NEWSAPI_ID
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
                NEWSAPI_ID,
                SOURCE_NAME,
                "NewsAPI API key not configured",
                None,
            );
        }
        if query.as_str().trim().is_empty() {
            return SourceOutcome::failure(
                NEWSAPI_ID,
                SOURCE_NAME,
                "Query must not be empty",
                None,
            );
        }

        let url = self.request_url(query);
        let headers = vec![("X-Api-Key".to_string(), self.config.api_key.clone())];

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
                SourceOutcome::failure(NEWSAPI_ID, SOURCE_NAME, message, code)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    source: Option<NewsApiSourceRef>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceRef {
    name: Option<String>,
}

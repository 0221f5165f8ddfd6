use crate::fetcher::with_retry;
use crate::sources::{describe_fetch_error, parse_publish_date, urlencode, NEWSDATA_ID};
use crate::traits::{FetchJson, SearchSource};
use crate::types::{Query, SearchItem, SourceConfig, SourceOutcome, NO_TITLE};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://newsdata.io/api/1/latest";
/// Free-plan maximum for the `size` parameter.
pub const MAX_SIZE: usize = 10;

const SOURCE_NAME: &str = "Newsdata.io";

/// Adapter for Newsdata.io, the secondary news source behind NewsAPI.
pub struct NewsdataSource {
    config: SourceConfig,
    fetcher: Arc<dyn FetchJson>,
}

impl NewsdataSource {
    pub fn new(config: SourceConfig, fetcher: Arc<dyn FetchJson>) -> Self {
        Self { config, fetcher }
    }

    fn request_url(&self, query: &Query) -> String {
        let size = self.config.max_results.clamp(1, MAX_SIZE);
        // Newsdata.io authenticates via a query-string key, not a header.
        format!(
            "{}?apikey={}&q={}&size={}",
            self.config.base_url,
            urlencode(&self.config.api_key),
            urlencode(query.as_str()),
            size
        )
    }

    fn parse_payload(&self, payload: serde_json::Value) -> SourceOutcome {
        // On errors the `results` field is an object holding the message,
        // so classify the status flag before attempting a typed decode.
        let status = payload
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        if status != "success" {
            let message = payload
                .pointer("/results/message")
                .or_else(|| payload.get("message"))
                .and_then(|v| v.as_str())
                .unwrap_or("Newsdata.io reported an error")
                .to_string();
            return SourceOutcome::failure(NEWSDATA_ID, SOURCE_NAME, message, None);
        }

        let parsed: NewsdataResponse = match serde_json::from_value(payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                return SourceOutcome::failure(
                    NEWSDATA_ID,
                    SOURCE_NAME,
                    format!("Unexpected Newsdata.io response: {}", e),
                    None,
                )
            }
        };

        let items: Vec<SearchItem> = parsed
            .results
            .into_iter()
            .take(self.config.max_results)
            .map(|r| SearchItem {
                title: r
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| NO_TITLE.to_string()),
                url: r.link.unwrap_or_default(),
                description: r.description.unwrap_or_default(),
                published_at: r.pub_date.as_deref().and_then(parse_publish_date),
                author: r.creator.and_then(Creator::into_author),
                source_name: r.source_id,
            })
            .collect();

        info!("Newsdata.io returned {} articles", items.len());
        SourceOutcome::success(NEWSDATA_ID, SOURCE_NAME, items)
    }
}

#[async_trait]
impl SearchSource for NewsdataSource {
    fn source_id(&self) -> &str {
        NEWSDATA_ID
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
                NEWSDATA_ID,
                SOURCE_NAME,
                "Newsdata.io API key not configured",
                None,
            );
        }
        if query.as_str().trim().is_empty() {
            return SourceOutcome::failure(
                NEWSDATA_ID,
                SOURCE_NAME,
                "Query must not be empty",
                None,
            );
        }

        let url = self.request_url(query);

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
                SourceOutcome::failure(NEWSDATA_ID, SOURCE_NAME, message, code)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewsdataResponse {
    #[serde(default)]
    results: Vec<NewsdataResult>,
}

#[derive(Debug, Deserialize)]
struct NewsdataResult {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    creator: Option<Creator>,
    source_id: Option<String>,
}

/// Newsdata.io serializes `creator` as either a string or a string array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Creator {
    One(String),
    Many(Vec<String>),
}

impl Creator {
    fn into_author(self) -> Option<String> {
        match self {
            Creator::One(name) if !name.is_empty() => Some(name),
            Creator::One(_) => None,
            Creator::Many(names) => {
                let joined = names
                    .into_iter()
                    .filter(|n| !n.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                if joined.is_empty() {
                    None
                } else {
                    Some(joined)
                }
            }
        }
    }
}

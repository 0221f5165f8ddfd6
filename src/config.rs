use crate::host::HostIo;
use crate::sources::{brave, google, newsapi, newsdata};
use crate::sources::{BRAVE_ID, GOOGLE_ID, NEWSAPI_ID, NEWSDATA_ID};
use crate::types::{SchedulingMode, SourceConfig};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// All four source configurations, keys resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub brave: SourceConfig,
    pub newsapi: SourceConfig,
    pub newsdata: SourceConfig,
    pub google: SourceConfig,
}

/// Effective configuration for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub timeout_ms: u64,
    pub max_attempts: u32,
    pub max_results_per_source: usize,
    pub enabled_sources: Vec<String>,
    pub scheduling: SchedulingMode,
    pub copy_to_clipboard: bool,
    pub show_notifications: bool,
    pub sources: SourcesConfig,
}

/// Per-run overrides supplied by the CLI or an automation trigger.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub timeout_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub max_results: Option<usize>,
    pub sources: Option<Vec<String>>,
    pub sequential: bool,
    pub no_clipboard: bool,
    pub no_notify: bool,
    pub brave_key: Option<String>,
    pub newsapi_key: Option<String>,
    pub newsdata_key: Option<String>,
    pub google_key: Option<String>,
    pub google_engine_id: Option<String>,
}

impl AppConfig {
    /// Build the effective configuration: documented defaults, CLI
    /// overrides, and per-source API keys resolved through the precedence
    /// chain (override, credential store, environment).
    pub fn load(host: &dyn HostIo, overrides: &ConfigOverrides) -> Self {
        let timeout_ms = overrides.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        let max_attempts = overrides.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let max_results = overrides.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

        let base = SourceConfig {
            timeout_ms,
            max_attempts,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_results,
            ..SourceConfig::default()
        };

        let sources = SourcesConfig {
            brave: SourceConfig {
                base_url: brave::DEFAULT_BASE_URL.to_string(),
                api_key: resolve_secret(
                    overrides.brave_key.as_deref(),
                    host,
                    "brave-api-key",
                    "BRAVE_API_KEY",
                ),
                ..base.clone()
            },
            newsapi: SourceConfig {
                base_url: newsapi::DEFAULT_BASE_URL.to_string(),
                api_key: resolve_secret(
                    overrides.newsapi_key.as_deref(),
                    host,
                    "newsapi-api-key",
                    "NEWSAPI_API_KEY",
                ),
                ..base.clone()
            },
            newsdata: SourceConfig {
                base_url: newsdata::DEFAULT_BASE_URL.to_string(),
                api_key: resolve_secret(
                    overrides.newsdata_key.as_deref(),
                    host,
                    "newsdata-api-key",
                    "NEWSDATA_API_KEY",
                ),
                ..base.clone()
            },
            google: SourceConfig {
                base_url: google::DEFAULT_BASE_URL.to_string(),
                api_key: resolve_secret(
                    overrides.google_key.as_deref(),
                    host,
                    "google-api-key",
                    "GOOGLE_API_KEY",
                ),
                engine_id: non_empty(resolve_secret(
                    overrides.google_engine_id.as_deref(),
                    host,
                    "google-engine-id",
                    "GOOGLE_SEARCH_ENGINE_ID",
                )),
                ..base.clone()
            },
        };

        let enabled_sources = match &overrides.sources {
            Some(requested) => {
                let known = [BRAVE_ID, NEWSAPI_ID, NEWSDATA_ID, GOOGLE_ID];
                let mut enabled = Vec::new();
                for id in requested {
                    if known.contains(&id.as_str()) {
                        enabled.push(id.clone());
                    } else {
                        warn!("Unknown source \"{}\" ignored", id);
                    }
                }
                enabled
            }
            None => {
                // Default: every source that has a key.
                let mut enabled = Vec::new();
                for (id, config) in [
                    (BRAVE_ID, &sources.brave),
                    (NEWSAPI_ID, &sources.newsapi),
                    (NEWSDATA_ID, &sources.newsdata),
                    (GOOGLE_ID, &sources.google),
                ] {
                    if config.is_configured() {
                        enabled.push(id.to_string());
                    } else {
                        warn!("Source {} disabled: no API key configured", id);
                    }
                }
                enabled
            }
        };

        Self {
            timeout_ms,
            max_attempts,
            max_results_per_source: max_results,
            enabled_sources,
            scheduling: if overrides.sequential {
                SchedulingMode::Sequential
            } else {
                SchedulingMode::Parallel
            },
            copy_to_clipboard: !overrides.no_clipboard,
            show_notifications: !overrides.no_notify,
            sources,
        }
    }

    /// Copy of the config with API keys masked, for `--config` output.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for source in [
            &mut copy.sources.brave,
            &mut copy.sources.newsapi,
            &mut copy.sources.newsdata,
            &mut copy.sources.google,
        ] {
            if !source.api_key.is_empty() {
                source.api_key = "***".to_string();
            }
        }
        copy
    }
}

/// First present value wins: explicit override, platform credential store,
/// process environment. Empty string when nothing is configured.
fn resolve_secret(
    explicit: Option<&str>,
    host: &dyn HostIo,
    credential_name: &str,
    env_key: &str,
) -> String {
    if let Some(value) = explicit {
        if !value.trim().is_empty() {
            return value.trim().to_string();
        }
    }
    if let Some(value) = host.credential(credential_name) {
        if !value.trim().is_empty() {
            return value.trim().to_string();
        }
    }
    if let Ok(value) = env::var(env_key) {
        if !value.trim().is_empty() {
            return value.trim().to_string();
        }
    }
    String::new()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

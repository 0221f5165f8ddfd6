pub mod brave;
pub mod google;
pub mod newsapi;
pub mod newsdata;

pub use brave::BraveSource;
pub use google::GoogleSource;
pub use newsapi::NewsApiSource;
pub use newsdata::NewsdataSource;

use crate::types::AggregatorError;
use chrono::{DateTime, NaiveDateTime, Utc};

pub const BRAVE_ID: &str = "brave";
pub const NEWSAPI_ID: &str = "newsapi";
pub const NEWSDATA_ID: &str = "newsdata";
pub const GOOGLE_ID: &str = "google";

/// Map a failed fetch to the user-facing message plus the HTTP code.
/// Known statuses get a short explanation; anything else passes through.
pub(crate) fn describe_fetch_error(err: &AggregatorError) -> (String, Option<u16>) {
    let code = err.status_code();
    let message = match code {
        Some(401) => "Invalid API key".to_string(),
        Some(403) => "Access forbidden".to_string(),
        Some(426) => "Upgrade required".to_string(),
        Some(429) => "Rate limit exceeded".to_string(),
        _ => err.to_string(),
    };
    (message, code)
}

/// Best-effort parse of the publish timestamps these APIs hand back:
/// RFC 3339 (NewsAPI, Brave, Google metatags) or the bare
/// "YYYY-MM-DD HH:MM:SS" shape Newsdata.io uses.
pub(crate) fn parse_publish_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

pub(crate) fn urlencode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

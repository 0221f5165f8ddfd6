pub mod types;
pub mod traits;
pub mod config;
pub mod fetcher;
pub mod sources;
pub mod aggregator;
pub mod presenter;
pub mod host;

pub use types::*;
pub use traits::{FetchJson, SearchSource};
pub use config::{AppConfig, ConfigOverrides, SourcesConfig};
pub use fetcher::{with_retry, HttpFetcher};
pub use sources::{BraveSource, GoogleSource, NewsApiSource, NewsdataSource};
pub use aggregator::SearchAggregator;
pub use presenter::{notification_summary, render_report};
pub use host::{DesktopHost, HostIo};

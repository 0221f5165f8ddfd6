mod common;

use common::{init_tracing, MemoryHost};
use search_aggregator::types::SchedulingMode;
use search_aggregator::{AppConfig, ConfigOverrides};

#[test]
fn explicit_override_beats_the_credential_store() {
    init_tracing();

    let host = MemoryHost::new().with_credential("brave-api-key", "stored-key");
    let overrides = ConfigOverrides {
        brave_key: Some("explicit-key".to_string()),
        sources: Some(vec!["brave".to_string()]),
        ..ConfigOverrides::default()
    };

    let config = AppConfig::load(&host, &overrides);
    assert_eq!(config.sources.brave.api_key, "explicit-key");
}

#[test]
fn credential_store_is_used_when_no_override_given() {
    init_tracing();

    let host = MemoryHost::new().with_credential("brave-api-key", "stored-key");
    let overrides = ConfigOverrides {
        sources: Some(vec!["brave".to_string()]),
        ..ConfigOverrides::default()
    };

    let config = AppConfig::load(&host, &overrides);
    assert_eq!(config.sources.brave.api_key, "stored-key");
}

#[test]
fn sources_with_keys_are_enabled_by_default() {
    init_tracing();

    let host = MemoryHost::new().with_credential("brave-api-key", "stored-key");
    let config = AppConfig::load(&host, &ConfigOverrides::default());

    assert!(config.enabled_sources.contains(&"brave".to_string()));
}

#[test]
fn unknown_source_names_are_filtered_out() {
    init_tracing();

    let host = MemoryHost::new();
    let overrides = ConfigOverrides {
        sources: Some(vec!["brave".to_string(), "bogus".to_string()]),
        ..ConfigOverrides::default()
    };

    let config = AppConfig::load(&host, &overrides);
    assert_eq!(config.enabled_sources, vec!["brave".to_string()]);
}

#[test]
fn redacted_masks_configured_keys_only() {
    init_tracing();

    let host = MemoryHost::new().with_credential("brave-api-key", "stored-key");
    let overrides = ConfigOverrides {
        sources: Some(vec!["brave".to_string()]),
        ..ConfigOverrides::default()
    };

    let redacted = AppConfig::load(&host, &overrides).redacted();
    assert_eq!(redacted.sources.brave.api_key, "***");
    // An unset key has nothing to hide and stays empty.
    assert_eq!(redacted.sources.newsdata.api_key, "");
}

#[test]
fn sequential_flag_selects_sequential_scheduling() {
    init_tracing();

    let host = MemoryHost::new();
    let overrides = ConfigOverrides {
        sequential: true,
        ..ConfigOverrides::default()
    };

    let config = AppConfig::load(&host, &overrides);
    assert_eq!(config.scheduling, SchedulingMode::Sequential);

    let config = AppConfig::load(&host, &ConfigOverrides::default());
    assert_eq!(config.scheduling, SchedulingMode::Parallel);
}

#[test]
fn defaults_match_the_documented_surface() {
    init_tracing();

    let host = MemoryHost::new();
    let config = AppConfig::load(&host, &ConfigOverrides::default());

    assert_eq!(config.timeout_ms, 10_000);
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.max_results_per_source, 5);
    assert!(config.copy_to_clipboard);
    assert!(config.show_notifications);
}

mod common;

use common::init_tracing;
use search_aggregator::types::AggregatorError;
use search_aggregator::with_retry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::test]
async fn exhausts_attempts_and_returns_last_error() {
    init_tracing();

    let calls = AtomicUsize::new(0);
    let result: search_aggregator::Result<()> = with_retry(3, Duration::from_millis(10), || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move { Err(AggregatorError::General(format!("boom {}", attempt))) }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("boom 3"), "got: {}", err);
}

#[tokio::test]
async fn returns_success_after_one_transient_failure() {
    init_tracing();

    let calls = AtomicUsize::new(0);
    let result = with_retry(3, Duration::from_millis(10), || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if attempt < 2 {
                Err(AggregatorError::General("transient".to_string()))
            } else {
                Ok(42)
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn first_attempt_success_fires_once() {
    init_tracing();

    let calls = AtomicUsize::new(0);
    let result = with_retry(5, Duration::from_millis(10), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok("hit") }
    })
    .await;

    assert_eq!(result.unwrap(), "hit");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_attempt_budget_still_tries_once() {
    init_tracing();

    let calls = AtomicUsize::new(0);
    let result: search_aggregator::Result<()> = with_retry(0, Duration::from_millis(10), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Err(AggregatorError::General("boom".to_string())) }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

use search_aggregator::types::{AggregatorError, Query};

#[test]
fn trims_surrounding_whitespace() {
    let query = Query::new("  ai news  ").unwrap();
    assert_eq!(query.as_str(), "ai news");
}

#[test]
fn rejects_empty_and_too_short_input() {
    assert!(matches!(
        Query::new(""),
        Err(AggregatorError::Validation(_))
    ));
    assert!(matches!(
        Query::new("   "),
        Err(AggregatorError::Validation(_))
    ));
    assert!(matches!(
        Query::new("a"),
        Err(AggregatorError::Validation(_))
    ));
    assert!(Query::new("ab").is_ok());
}

#[test]
fn truncates_long_input_at_a_word_boundary() {
    let input = "word ".repeat(50); // 250 characters
    let query = Query::new(&input).unwrap();

    assert!(query.as_str().len() <= Query::MAX_LEN);
    assert!(query.as_str().len() >= 150);
    assert!(query.as_str().ends_with("word"), "got: {}", query.as_str());
}

#[test]
fn unbroken_input_is_cut_hard_at_the_limit() {
    let input = "x".repeat(250);
    let query = Query::new(&input).unwrap();
    assert_eq!(query.as_str().len(), Query::MAX_LEN);
}

#[test]
fn short_input_passes_through_unchanged() {
    let query = Query::new("rust async runtime comparison").unwrap();
    assert_eq!(query.as_str(), "rust async runtime comparison");
}

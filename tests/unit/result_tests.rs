/*!
 * Tests for layer and translation result types
 */

use std::collections::HashSet;

use translex::translation::result::{CacheMetrics, LayerDebugInfo, LayerResult};
use translex::TranslationResult;

/// Test the layer result to debug info mapping for failures
#[test]
fn test_layerDebugInfo_fromResult_shouldCarryFailureDetails() {
    let result = LayerResult::failure("unchanged", "lookup failed", 7);
    let info = LayerDebugInfo::from_result("substitution", &result);

    assert_eq!(info.layer_name, "substitution");
    assert!(!info.skipped);
    assert!(!info.is_successful);
    assert_eq!(info.processing_time_ms, 7);
    assert_eq!(info.error_message.as_deref(), Some("lookup failed"));
    assert!(info.has_error());
}

/// Test that a skipped layer record is not an error
#[test]
fn test_layerDebugInfo_skipped_shouldNotCountAsError() {
    let info = LayerDebugInfo::skipped("grammar", "not applicable");

    assert!(info.skipped);
    assert!(info.is_successful);
    assert!(!info.has_error());
    assert_eq!(info.summary, "skipped: not applicable");
}

/// Test that layers_processed counts executed layers only
#[test]
fn test_translationResult_withLayerResults_shouldCountExecutedLayersOnly() {
    let executed = LayerResult::success("out", 3, 2, 1, "done");
    let result = TranslationResult::success("in", "out", "en-ru", 0.9, 10).with_layer_results(vec![
        LayerDebugInfo::from_result("preprocessing", &executed),
        LayerDebugInfo::skipped("grammar", "no rules"),
        LayerDebugInfo::from_result("substitution", &executed),
    ]);

    assert_eq!(result.layers_processed, 2);
    assert_eq!(result.layer_results.len(), 3);
}

/// Test failure detection across the recorded layers
#[test]
fn test_translationResult_hasLayerFailures_shouldDetectFailedLayer() {
    let ok = TranslationResult::success("in", "out", "en-ru", 0.9, 10).with_layer_results(vec![
        LayerDebugInfo::skipped("grammar", "no rules"),
    ]);
    assert!(!ok.has_layer_failures());

    let failed = LayerResult::failure("in", "boom", 2);
    let broken = TranslationResult::success("in", "out", "en-ru", 0.9, 10).with_layer_results(
        vec![LayerDebugInfo::from_result("substitution", &failed)],
    );
    assert!(broken.has_layer_failures());
}

/// Test that hashing agrees with semantic equality
#[test]
fn test_translationResult_hash_shouldAgreeWithEquality() {
    let mut results = HashSet::new();
    results.insert(TranslationResult::success("hi", "привет", "en-ru", 0.9, 12));
    // Same translation with different timing collapses to one entry
    results.insert(TranslationResult::success("hi", "привет", "en-ru", 0.9, 340));
    results.insert(TranslationResult::success("hi", "привет", "en-es", 0.9, 12));

    assert_eq!(results.len(), 2);
}

/// Test serialization of the optional and nested fields
#[test]
fn test_translationResult_toValue_shouldSerializeNestedFields() {
    let metrics = CacheMetrics {
        word_hits: 5,
        word_misses: 2,
        phrase_hits: 1,
        phrase_misses: 0,
        estimated_time_saved_ms: 26,
    };
    let result = TranslationResult::success("good morning", "доброе утро", "en-ru", 0.95, 20)
        .with_alternatives(vec!["хороший утро".to_string()])
        .with_cache_metrics(metrics);

    let value = result.to_value().unwrap();

    assert_eq!(value["alternatives"][0], "хороший утро");
    assert_eq!(value["cacheMetrics"]["wordHits"], 5);
    assert_eq!(value["cacheMetrics"]["estimatedTimeSavedMs"], 26);
    assert_eq!(value["qualityScore"], serde_json::Value::Null);
}

/// Test the aggregate counters on cache metrics
#[test]
fn test_cacheMetrics_totals_shouldSumWordAndPhraseCounters() {
    let metrics = CacheMetrics {
        word_hits: 3,
        word_misses: 1,
        phrase_hits: 2,
        phrase_misses: 4,
        estimated_time_saved_ms: 0,
    };

    assert_eq!(metrics.hits(), 5);
    assert_eq!(metrics.misses(), 5);
    assert!((metrics.hit_rate() - 0.5).abs() < f64::EPSILON);
}

/*!
 * Tests for the word and phrase caches
 */

use translex::repositories::{PhraseRecord, WordRecord};
use translex::translation::CacheManager;

/// Test that metrics distinguish word and phrase traffic
#[test]
fn test_cacheManager_metrics_shouldTrackHitsAndMissesPerKind() {
    let cache = CacheManager::new(16, 16);

    assert!(cache.get_word("en-ru", "good").is_none());
    cache.store_word("en-ru", "good", WordRecord::new("good", "хороший", "en-ru"));
    assert!(cache.get_word("en-ru", "good").is_some());

    assert!(cache.get_phrase("en-ru", "good morning").is_none());
    cache.store_phrase(
        "en-ru",
        "good morning",
        PhraseRecord::new("good morning", "доброе утро", "en-ru"),
    );
    assert!(cache.get_phrase("en-ru", "good morning").is_some());
    assert!(cache.get_phrase("en-ru", "good morning").is_some());

    let metrics = cache.metrics();
    assert_eq!(metrics.word_hits, 1);
    assert_eq!(metrics.word_misses, 1);
    assert_eq!(metrics.phrase_hits, 2);
    assert_eq!(metrics.phrase_misses, 1);
    assert_eq!(metrics.hits(), 3);
    assert_eq!(metrics.misses(), 2);
}

/// Test the estimated time saved accounting
#[test]
fn test_cacheManager_metrics_shouldEstimateTimeSaved() {
    let cache = CacheManager::new(16, 16);
    cache.store_word("en-ru", "good", WordRecord::new("good", "хороший", "en-ru"));
    cache.store_phrase(
        "en-ru",
        "good morning",
        PhraseRecord::new("good morning", "доброе утро", "en-ru"),
    );

    // Two word hits and one phrase hit
    cache.get_word("en-ru", "good");
    cache.get_word("en-ru", "good");
    cache.get_phrase("en-ru", "good morning");

    // Word hits save 4ms each, phrase hits 6ms
    assert_eq!(cache.metrics().estimated_time_saved_ms, 2 * 4 + 6);
}

/// Test that entries are scoped to their language pair
#[test]
fn test_cacheManager_lookup_shouldIsolateLanguagePairs() {
    let cache = CacheManager::new(16, 16);
    cache.store_word("en-ru", "good", WordRecord::new("good", "хороший", "en-ru"));

    assert!(cache.get_word("en-ru", "good").is_some());
    assert!(cache.get_word("en-es", "good").is_none());
}

/// Test that lookup keys are normalized
#[test]
fn test_cacheManager_lookup_shouldNormalizeKeyText() {
    let cache = CacheManager::new(16, 16);
    cache.store_word("en-ru", "Good", WordRecord::new("good", "хороший", "en-ru"));

    assert!(cache.get_word("en-ru", "good").is_some());
    assert!(cache.get_word("en-ru", "\"GOOD!\"").is_some());
}

/// Test capacity bounds and eviction of the least recently used entry
#[test]
fn test_cacheManager_store_beyondCapacity_shouldEvictOldest() {
    let cache = CacheManager::new(2, 2);
    cache.store_word("en-ru", "one", WordRecord::new("one", "один", "en-ru"));
    cache.store_word("en-ru", "two", WordRecord::new("two", "два", "en-ru"));

    // Touch "one" so "two" becomes the eviction candidate
    cache.get_word("en-ru", "one");
    cache.store_word("en-ru", "three", WordRecord::new("three", "три", "en-ru"));

    assert_eq!(cache.word_len(), 2);
    assert!(cache.get_word("en-ru", "one").is_some());
    assert!(cache.get_word("en-ru", "two").is_none());
    assert!(cache.get_word("en-ru", "three").is_some());
}

/// Test clearing both caches and counters
#[test]
fn test_cacheManager_clear_shouldEmptyCachesAndResetMetrics() {
    let cache = CacheManager::new(16, 16);
    cache.store_word("en-ru", "good", WordRecord::new("good", "хороший", "en-ru"));
    cache.get_word("en-ru", "good");

    cache.clear();

    assert!(cache.is_empty());
    let metrics = cache.metrics();
    assert_eq!(metrics.hits(), 0);
    assert_eq!(metrics.misses(), 0);
    assert_eq!(metrics.estimated_time_saved_ms, 0);
}

/*!
 * Tests for the translation memoization cache
 */

use polysub::translation::TranslationCache;

#[test]
fn test_cache_get_withStoredTranslation_shouldReturnIt() {
    let cache = TranslationCache::new(true);

    cache.store("Hello", "en", "fa", "سلام");

    assert_eq!(cache.get("Hello", "en", "fa"), Some("سلام".to_string()));
}

#[test]
fn test_cache_get_withDifferentLanguagePair_shouldMiss() {
    let cache = TranslationCache::new(true);

    cache.store("Hello", "en", "fa", "سلام");

    assert_eq!(cache.get("Hello", "en", "es"), None);
    assert_eq!(cache.get("Hello", "de", "fa"), None);
}

#[test]
fn test_cache_get_withSurroundingWhitespace_shouldHit() {
    // Keys hash the trimmed text, so padding does not defeat memoization
    let cache = TranslationCache::new(true);

    cache.store("Hello", "en", "fa", "سلام");

    assert_eq!(cache.get("  Hello \n", "en", "fa"), Some("سلام".to_string()));
}

#[test]
fn test_cache_stats_shouldCountHitsAndMisses() {
    let cache = TranslationCache::new(true);
    cache.store("a", "en", "fa", "x");

    cache.get("a", "en", "fa");
    cache.get("a", "en", "fa");
    cache.get("missing", "en", "fa");

    let (hits, misses, hit_rate) = cache.stats();
    assert_eq!(hits, 2);
    assert_eq!(misses, 1);
    assert!((hit_rate - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_cache_withCachingDisabled_shouldStoreNothing() {
    let cache = TranslationCache::new(false);

    cache.store("Hello", "en", "fa", "سلام");

    assert_eq!(cache.get("Hello", "en", "fa"), None);
    assert!(cache.is_empty());
    assert!(!cache.is_enabled());

    let (hits, misses, _) = cache.stats();
    assert_eq!((hits, misses), (0, 0));
}

#[test]
fn test_cache_clear_shouldResetEntriesAndCounters() {
    let cache = TranslationCache::new(true);
    cache.store("a", "en", "fa", "x");
    cache.get("a", "en", "fa");

    cache.clear();

    assert!(cache.is_empty());
    let (hits, misses, hit_rate) = cache.stats();
    assert_eq!((hits, misses), (0, 0));
    assert_eq!(hit_rate, 0.0);
}

#[test]
fn test_cache_clone_shouldShareStorage() {
    let cache = TranslationCache::new(true);
    let clone = cache.clone();

    cache.store("a", "en", "fa", "x");

    assert_eq!(clone.get("a", "en", "fa"), Some("x".to_string()));
    assert_eq!(clone.len(), 1);
}

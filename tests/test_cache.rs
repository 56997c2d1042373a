//! Cache tests: memory and file caches, expiry, corrupt files, fetcher behavior.

mod common;

use common::{series, wavy, StubProvider, TableResolver};
use std::fs;
use std::time::Duration;
use stock_risk::providers::SymbolVariant;
use stock_risk::{
    CacheKey, FileCache, HistoryFetcher, MemoryCache, NoCache, Period, PriceCache, StockAnalyzer,
    Throttle,
};

const HOUR: Duration = Duration::from_secs(3600);

// ---------------------------------------------------------------------------
// MemoryCache
// ---------------------------------------------------------------------------

#[test]
fn memory_cache_round_trips_within_ttl() {
    let cache = MemoryCache::new();
    let key = CacheKey::new("TCS.NS", Period::FiveYears);
    cache.put(key.clone(), series(&[1.0, 2.0]), HOUR);

    assert_eq!(cache.get(&key).unwrap().closes(), vec![1.0, 2.0]);
    assert_eq!(cache.len(), 1);
}

#[test]
fn memory_cache_keys_include_period() {
    let cache = MemoryCache::new();
    cache.put(CacheKey::new("TCS.NS", Period::FiveYears), series(&[1.0]), HOUR);
    assert!(cache.get(&CacheKey::new("TCS.NS", Period::OneYear)).is_none());
}

#[test]
fn memory_cache_expired_entry_is_miss_and_evicted() {
    let cache = MemoryCache::new();
    let key = CacheKey::new("TCS.NS", Period::FiveYears);
    cache.put(key.clone(), series(&[1.0]), Duration::ZERO);

    assert!(cache.get(&key).is_none());
    assert!(cache.is_empty());
}

#[test]
fn memory_cache_accepts_ttl_beyond_instant_range() {
    let cache = MemoryCache::new();
    let key = CacheKey::new("TCS.NS", Period::FiveYears);
    cache.put(key.clone(), series(&[1.0, 2.0]), Duration::MAX);

    assert_eq!(cache.get(&key).unwrap().closes(), vec![1.0, 2.0]);
}

#[test]
fn analyzer_with_unbounded_ttl_serves_repeat_requests_from_cache() {
    let provider = StubProvider::new(vec![
        ("TCS.NS", series(&wavy(30, 3500.0))),
        ("^NSEI", series(&wavy(30, 20000.0))),
    ]);
    let analyzer = StockAnalyzer::builder()
        .resolver(TableResolver::new(&[("TCS", "TCS")]))
        .provider(provider.clone())
        .cache(MemoryCache::new())
        .cache_ttl(Duration::MAX)
        .fetch_interval(Duration::ZERO)
        .build()
        .unwrap();

    analyzer.analyze("TCS").unwrap();
    analyzer.analyze("TCS").unwrap();
    assert_eq!(provider.calls(), vec!["TCS.NS", "^NSEI"]);
}

#[test]
fn memory_cache_put_prunes_expired_entries() {
    let cache = MemoryCache::new();
    cache.put(CacheKey::new("OLD.NS", Period::FiveYears), series(&[1.0]), Duration::ZERO);
    cache.put(CacheKey::new("NEW.NS", Period::FiveYears), series(&[2.0]), HOUR);

    assert_eq!(cache.len(), 1);
    assert!(cache.get(&CacheKey::new("NEW.NS", Period::FiveYears)).is_some());
}

#[test]
fn no_cache_always_misses() {
    let key = CacheKey::new("TCS.NS", Period::FiveYears);
    NoCache.put(key.clone(), series(&[1.0]), HOUR);
    assert!(NoCache.get(&key).is_none());
}

// ---------------------------------------------------------------------------
// FileCache
// ---------------------------------------------------------------------------

#[test]
fn file_cache_persists_across_instances() {
    let tmp = tempfile::tempdir().unwrap();
    let key = CacheKey::new("^NSEI", Period::FiveYears);

    FileCache::new(Some(tmp.path().to_path_buf()))
        .unwrap()
        .put(key.clone(), series(&[10.0, 11.0, 12.0]), HOUR);

    let reopened = FileCache::new(Some(tmp.path().to_path_buf())).unwrap();
    let hit = reopened.get(&key).unwrap();
    assert_eq!(hit, series(&[10.0, 11.0, 12.0]));
}

#[test]
fn file_cache_creates_missing_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("nested").join("cache");
    FileCache::new(Some(dir.clone())).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn file_cache_expired_entry_is_removed() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = FileCache::new(Some(tmp.path().to_path_buf())).unwrap();
    let key = CacheKey::new("TCS.NS", Period::FiveYears);

    cache.put(key.clone(), series(&[1.0]), Duration::ZERO);
    let path = cache.path_for(&key);
    assert!(path.exists());

    assert!(cache.get(&key).is_none());
    assert!(!path.exists());
}

#[test]
fn file_cache_corrupt_file_is_removed() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = FileCache::new(Some(tmp.path().to_path_buf())).unwrap();
    let key = CacheKey::new("TCS.NS", Period::FiveYears);

    let path = cache.path_for(&key);
    fs::write(&path, b"{ not json").unwrap();

    assert!(cache.get(&key).is_none());
    assert!(!path.exists());
}

#[test]
fn file_cache_clear_empties_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = FileCache::new(Some(tmp.path().join("c"))).unwrap();
    let key = CacheKey::new("TCS.NS", Period::FiveYears);
    cache.put(key.clone(), series(&[1.0]), HOUR);

    cache.clear().unwrap();
    assert!(cache.cache_dir.is_dir());
    assert!(cache.get(&key).is_none());
    assert_eq!(fs::read_dir(&cache.cache_dir).unwrap().count(), 0);
}

// ---------------------------------------------------------------------------
// HistoryFetcher
// ---------------------------------------------------------------------------

fn fetcher(provider: StubProvider) -> HistoryFetcher {
    HistoryFetcher::new(
        Box::new(provider),
        Box::new(MemoryCache::new()),
        Throttle::disabled(),
        HOUR,
    )
}

#[test]
fn fetcher_hits_provider_once_per_key() {
    let provider = StubProvider::new(vec![("TCS.NS", series(&wavy(5, 10.0)))]);
    let f = fetcher(provider.clone());

    f.fetch("TCS.NS", Period::FiveYears).unwrap();
    f.fetch("TCS.NS", Period::FiveYears).unwrap();
    f.fetch("TCS.NS", Period::OneYear).unwrap();
    assert_eq!(provider.calls(), vec!["TCS.NS", "TCS.NS"]);
}

#[test]
fn fetcher_caches_empty_results() {
    let provider = StubProvider::new(vec![("X", series(&[1.0, 2.0]))]);
    let f = fetcher(provider.clone());
    let order = SymbolVariant::fallback_order();

    let first = f.fetch_first_available("X", &order, Period::FiveYears).unwrap().unwrap();
    let second = f.fetch_first_available("X", &order, Period::FiveYears).unwrap().unwrap();
    assert_eq!(first.symbol, "X");
    assert_eq!(second.symbol, "X");
    assert_eq!(provider.calls(), vec!["X.NS", "X.BO", "X"]);
}

#[test]
fn fetcher_returns_none_when_all_variants_empty() {
    let f = fetcher(StubProvider::default());
    let got = f
        .fetch_first_available("NONE", &SymbolVariant::fallback_order(), Period::FiveYears)
        .unwrap();
    assert!(got.is_none());
}

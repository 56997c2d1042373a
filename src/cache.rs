//! Price history caches keyed by `(symbol, period)` with a freshness window.
//!
//! [`PriceCache`] is the seam the analyzer fetches through. [`MemoryCache`]
//! keeps entries for the life of the process, [`FileCache`] persists them as
//! JSON files in the platform cache directory, and [`NoCache`] always misses.

use crate::config;
use crate::error::Result;
use crate::models::{Period, PriceSeries};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Identifies one fetched history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub period: Period,
}

impl CacheKey {
    pub fn new(symbol: &str, period: Period) -> Self {
        Self {
            symbol: symbol.to_string(),
            period,
        }
    }
}

/// Storage for fetched price histories.
///
/// Implementations decide where entries live; expired entries must read as
/// misses.
pub trait PriceCache: Send {
    fn get(&self, key: &CacheKey) -> Option<PriceSeries>;
    fn put(&self, key: CacheKey, value: PriceSeries, ttl: Duration);
}

// ---------------------------------------------------------------------------
// NoCache
// ---------------------------------------------------------------------------

/// A cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl PriceCache for NoCache {
    fn get(&self, _key: &CacheKey) -> Option<PriceSeries> {
        None
    }

    fn put(&self, _key: CacheKey, _value: PriceSeries, _ttl: Duration) {}
}

// ---------------------------------------------------------------------------
// MemoryCache
// ---------------------------------------------------------------------------

struct MemoryEntry {
    value: PriceSeries,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// In-process cache with per-entry expiry.
#[derive(Default)]
pub struct MemoryCache {
    entries: RefCell<HashMap<CacheKey, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl PriceCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<PriceSeries> {
        let mut entries = self.entries.borrow_mut();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(Instant::now()) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` and drops every entry that has already expired.
    fn put(&self, key: CacheKey, value: PriceSeries, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.borrow_mut();
        entries.retain(|_, entry| entry.is_fresh(now));
        entries.insert(
            key,
            MemoryEntry {
                value,
                expires_at: now.checked_add(ttl),
            },
        );
    }
}

// ---------------------------------------------------------------------------
// FileCache
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct FileEntry {
    symbol: String,
    period: Period,
    /// Unix seconds after which the entry is stale.
    expires_at: u64,
    series: PriceSeries,
}

/// On-disk cache, one JSON file per `(symbol, period)`.
pub struct FileCache {
    /// Directory where cached files are stored.
    pub cache_dir: PathBuf,
}

impl FileCache {
    /// Create a file cache.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { cache_dir: dir })
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir
            .join(format!("{}_{}.json", encode_symbol(&key.symbol), key.period))
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    fn read_entry(path: &Path) -> Option<FileEntry> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache file, removing");
                let _ = fs::remove_file(path);
                None
            }
        }
    }

    /// Write to a temp file first and rename, so a failed write never
    /// leaves a truncated entry behind.
    fn write_entry(path: &Path, entry: &FileEntry) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let result = (|| -> Result<()> {
            fs::write(&tmp, serde_json::to_vec(entry)?)?;
            fs::rename(&tmp, path)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

impl PriceCache for FileCache {
    fn get(&self, key: &CacheKey) -> Option<PriceSeries> {
        let path = self.path_for(key);
        let entry = Self::read_entry(&path)?;
        if entry.symbol != key.symbol || entry.period != key.period {
            return None;
        }
        if unix_now() >= entry.expires_at {
            debug!(path = %path.display(), "cache entry expired");
            let _ = fs::remove_file(&path);
            return None;
        }
        Some(entry.series)
    }

    fn put(&self, key: CacheKey, value: PriceSeries, ttl: Duration) {
        let path = self.path_for(&key);
        let entry = FileEntry {
            symbol: key.symbol,
            period: key.period,
            expires_at: unix_now().saturating_add(ttl.as_secs()),
            series: value,
        };
        if let Err(e) = Self::write_entry(&path, &entry) {
            warn!(path = %path.display(), error = %e, "failed to write cache file");
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Make a symbol safe for use as a file name. `^NSEI` and `_NSEI` must not
/// collide, so anything outside `[A-Za-z0-9-]` is percent-encoded.
fn encode_symbol(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len());
    for b in symbol.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

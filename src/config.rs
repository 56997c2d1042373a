use std::path::PathBuf;
use std::time::Duration;

pub const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const SEARCH_BASE: &str = "https://query2.finance.yahoo.com/v1/finance/search";

/// Browser-like user agent; Yahoo rejects requests without one.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Benchmark used for beta (NIFTY 50).
pub const MARKET_INDEX: &str = "^NSEI";

/// Trading days per year. `years = points / 252` is an approximation kept
/// for compatibility with previously published figures.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Exchange suffixes tried, in order, before the bare symbol (NSE, then BSE).
pub const EXCHANGE_SUFFIXES: [&str; 2] = [".NS", ".BO"];

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_FETCH_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How many quotes to ask the search endpoint for.
pub const SEARCH_QUOTES_COUNT: u32 = 5;

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("stock-risk")
    } else {
        PathBuf::from(".stock-risk-cache")
    }
}

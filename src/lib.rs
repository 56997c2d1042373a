//! Stock risk and return analysis.
//!
//! Resolves a company name to a ticker, downloads daily closing prices,
//! and computes CAGR, annualized volatility, maximum drawdown and beta
//! against a market index. The statistics live in [`metrics`] as pure
//! functions; [`StockAnalyzer`] wires a ticker resolver, a price provider,
//! a cache and a request throttle around them.
//!
//! # Quick start
//!
//! ```no_run
//! use stock_risk::StockAnalyzer;
//!
//! let analyzer = StockAnalyzer::builder().build().unwrap();
//! let analysis = analyzer.analyze("Infosys").unwrap();
//! println!("{}", stock_risk::render::render_dashboard(&analysis, 60));
//! ```

pub mod analysis;
#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod models;
pub mod providers;
pub mod render;
pub mod throttle;

#[cfg(feature = "async")]
pub use async_client::AsyncStockAnalyzer;
pub use cache::{CacheKey, FileCache, MemoryCache, NoCache, PriceCache};
pub use error::{AnalyzerError, Result};
pub use fetch::{Fetched, HistoryFetcher};
pub use models::{Analysis, BetaClass, Metrics, Period, PriceSeries, ReturnSeries};
pub use providers::{FirstTokenResolver, PriceProvider, TickerResolver, YahooClient};
pub use throttle::Throttle;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::analysis::AnalysisInput;
use crate::providers::SymbolVariant;

// ---------------------------------------------------------------------------
// StockAnalyzerBuilder
// ---------------------------------------------------------------------------

enum CacheChoice {
    Memory,
    File(Option<PathBuf>),
    Disabled,
    Custom(Box<dyn PriceCache>),
}

/// Builder for configuring and constructing a [`StockAnalyzer`].
///
/// Use [`StockAnalyzer::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](StockAnalyzerBuilder::build).
pub struct StockAnalyzerBuilder {
    period: Period,
    market_index: String,
    cache: CacheChoice,
    cache_ttl: Duration,
    fetch_interval: Duration,
    timeout: Duration,
    chart_base: String,
    search_base: String,
    resolver: Option<Box<dyn TickerResolver>>,
    provider: Option<Box<dyn PriceProvider>>,
}

impl Default for StockAnalyzerBuilder {
    fn default() -> Self {
        Self {
            period: Period::default(),
            market_index: config::MARKET_INDEX.to_string(),
            cache: CacheChoice::Memory,
            cache_ttl: config::DEFAULT_CACHE_TTL,
            fetch_interval: config::DEFAULT_FETCH_INTERVAL,
            timeout: config::DEFAULT_TIMEOUT,
            chart_base: config::CHART_BASE.to_string(),
            search_base: config::SEARCH_BASE.to_string(),
            resolver: None,
            provider: None,
        }
    }
}

impl StockAnalyzerBuilder {
    /// History span to analyze. Defaults to five years.
    pub fn period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    /// Benchmark symbol for beta. Defaults to `^NSEI`.
    pub fn market_index(mut self, symbol: &str) -> Self {
        self.market_index = symbol.to_string();
        self
    }

    /// Keep fetched histories in memory for the analyzer's lifetime (default).
    pub fn memory_cache(mut self) -> Self {
        self.cache = CacheChoice::Memory;
        self
    }

    /// Persist fetched histories as JSON files.
    ///
    /// If `dir` is `None`, the platform cache directory is used
    /// (e.g. `~/.cache/stock-risk` on Linux).
    pub fn file_cache(mut self, dir: Option<&Path>) -> Self {
        self.cache = CacheChoice::File(dir.map(Path::to_path_buf));
        self
    }

    /// Never cache; every analysis hits the provider.
    pub fn no_cache(mut self) -> Self {
        self.cache = CacheChoice::Disabled;
        self
    }

    /// Use a caller-supplied cache.
    pub fn cache<C: PriceCache + 'static>(mut self, cache: C) -> Self {
        self.cache = CacheChoice::Custom(Box::new(cache));
        self
    }

    /// Freshness window for cached histories. Defaults to one hour.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Minimum spacing between provider requests. Defaults to one second;
    /// `Duration::ZERO` disables throttling.
    pub fn fetch_interval(mut self, interval: Duration) -> Self {
        self.fetch_interval = interval;
        self
    }

    /// HTTP timeout for the built-in Yahoo client. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the built-in Yahoo client at other chart and search endpoints.
    pub fn base_urls(mut self, chart_base: &str, search_base: &str) -> Self {
        self.chart_base = chart_base.to_string();
        self.search_base = search_base.to_string();
        self
    }

    /// Replace the ticker resolver (Yahoo search by default).
    pub fn resolver<R: TickerResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Replace the price provider (Yahoo chart API by default).
    pub fn provider<P: PriceProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Build the analyzer.
    ///
    /// Creates the cache directory when a file cache is selected. No network
    /// requests are made until the first analysis.
    pub fn build(self) -> Result<StockAnalyzer> {
        let (resolver, provider) = match (self.resolver, self.provider) {
            (Some(r), Some(p)) => (r, p),
            (r, p) => {
                let yahoo =
                    YahooClient::with_base_urls(self.timeout, &self.chart_base, &self.search_base)?;
                let r: Box<dyn TickerResolver> = match r {
                    Some(r) => r,
                    None => Box::new(yahoo.clone()),
                };
                let p: Box<dyn PriceProvider> = match p {
                    Some(p) => p,
                    None => Box::new(yahoo),
                };
                (r, p)
            }
        };

        let cache: Box<dyn PriceCache> = match self.cache {
            CacheChoice::Memory => Box::new(MemoryCache::new()),
            CacheChoice::File(dir) => Box::new(FileCache::new(dir)?),
            CacheChoice::Disabled => Box::new(NoCache),
            CacheChoice::Custom(cache) => cache,
        };

        let throttle = Throttle::new(self.fetch_interval);
        let fetcher = HistoryFetcher::new(provider, cache, throttle, self.cache_ttl);

        Ok(StockAnalyzer {
            resolver,
            fetcher,
            period: self.period,
            market_index: self.market_index,
        })
    }
}

// ---------------------------------------------------------------------------
// StockAnalyzer
// ---------------------------------------------------------------------------

/// The main entry point: one call to [`analyze`](StockAnalyzer::analyze)
/// per company.
///
/// Created via [`StockAnalyzer::builder()`].
pub struct StockAnalyzer {
    resolver: Box<dyn TickerResolver>,
    fetcher: HistoryFetcher,
    period: Period,
    market_index: String,
}

impl StockAnalyzer {
    /// Create a new builder for configuring the analyzer.
    pub fn builder() -> StockAnalyzerBuilder {
        StockAnalyzerBuilder::default()
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn market_index(&self) -> &str {
        &self.market_index
    }

    /// Resolve a company name to a ticker.
    ///
    /// Fails with [`AnalyzerError::ResolutionFailure`] when nothing matches.
    pub fn resolve(&self, company_name: &str) -> Result<String> {
        let name = company_name.trim();
        if name.is_empty() {
            return Err(AnalyzerError::InvalidArgument(
                "company name must not be empty".to_string(),
            ));
        }
        self.resolver
            .resolve(name)?
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AnalyzerError::ResolutionFailure(name.to_string()))
    }

    /// Fetch a ticker's history, trying `.NS`, `.BO`, then the bare symbol.
    ///
    /// Fails with [`AnalyzerError::EmptyData`] when no variant has data.
    pub fn fetch_stock(&self, ticker: &str) -> Result<Fetched> {
        self.fetcher
            .fetch_first_available(ticker, &SymbolVariant::fallback_order(), self.period)?
            .ok_or_else(|| AnalyzerError::EmptyData(ticker.to_string()))
    }

    /// Fetch the benchmark history. The index symbol is used as-is.
    pub fn fetch_market(&self) -> Result<PriceSeries> {
        self.fetcher.fetch(&self.market_index, self.period)
    }

    /// Run a full analysis for one company.
    pub fn analyze(&self, company_name: &str) -> Result<Analysis> {
        let name = company_name.trim();
        let ticker = self.resolve(name)?;
        info!(company = name, %ticker, "resolved ticker");

        let stock = self.fetch_stock(&ticker)?;
        let market = self.fetch_market()?;

        analysis::compute(AnalysisInput {
            company_name: name,
            ticker: &ticker,
            symbol: &stock.symbol,
            market_index: &self.market_index,
            period: self.period,
            prices: &stock.series,
            market: &market,
        })
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for StockAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StockAnalyzer(period={}, market_index={})",
            self.period, self.market_index
        )
    }
}

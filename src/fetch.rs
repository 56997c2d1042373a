//! Cached, throttled price history retrieval with exchange-suffix fallback.

use std::time::Duration;

use tracing::{debug, info};

use crate::cache::{CacheKey, PriceCache};
use crate::error::Result;
use crate::models::{Period, PriceSeries};
use crate::providers::{PriceProvider, SymbolVariant};
use crate::throttle::Throttle;

/// Price history for the first symbol variant that produced data.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub symbol: String,
    pub series: PriceSeries,
}

/// Wraps a [`PriceProvider`] with a cache and a request throttle.
///
/// Only cache misses reach the provider, and only those are throttled.
pub struct HistoryFetcher {
    provider: Box<dyn PriceProvider>,
    cache: Box<dyn PriceCache>,
    throttle: Throttle,
    ttl: Duration,
}

impl HistoryFetcher {
    pub fn new(
        provider: Box<dyn PriceProvider>,
        cache: Box<dyn PriceCache>,
        throttle: Throttle,
        ttl: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            throttle,
            ttl,
        }
    }

    /// Fetch one symbol exactly as given.
    ///
    /// Empty results are cached too, so a missing exchange listing is not
    /// re-requested inside the freshness window.
    pub fn fetch(&self, symbol: &str, period: Period) -> Result<PriceSeries> {
        let key = CacheKey::new(symbol, period);
        if let Some(series) = self.cache.get(&key) {
            debug!(symbol, %period, points = series.len(), "cache hit");
            return Ok(series);
        }

        debug!(symbol, %period, "cache miss");
        self.throttle.wait();
        let series = self.provider.fetch(symbol, period)?;
        self.cache.put(key, series.clone(), self.ttl);
        Ok(series)
    }

    /// Try each variant in order and return the first non-empty history.
    ///
    /// Returns `None` when every variant came back empty.
    pub fn fetch_first_available(
        &self,
        ticker: &str,
        variants: &[SymbolVariant],
        period: Period,
    ) -> Result<Option<Fetched>> {
        for variant in variants {
            let symbol = variant.apply(ticker);
            let series = self.fetch(&symbol, period)?;
            if !series.is_empty() {
                info!(ticker, %symbol, points = series.len(), "price history found");
                return Ok(Some(Fetched { symbol, series }));
            }
            debug!(%symbol, "no data for variant");
        }
        Ok(None)
    }
}

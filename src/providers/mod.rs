//! External collaborators: ticker lookup and price history retrieval.

pub mod symbol;
pub mod yahoo;

pub use symbol::{FirstTokenResolver, SymbolVariant};
pub use yahoo::YahooClient;

use crate::error::Result;
use crate::models::{Period, PriceSeries};

/// Maps a free-text company name to a ticker symbol.
pub trait TickerResolver: Send {
    /// `Ok(None)` when nothing matches; `Err` only for transport failures.
    fn resolve(&self, name: &str) -> Result<Option<String>>;
}

/// Supplies daily closing prices for a symbol.
pub trait PriceProvider: Send {
    /// An unknown symbol yields an empty series rather than an error.
    fn fetch(&self, symbol: &str, period: Period) -> Result<PriceSeries>;
}

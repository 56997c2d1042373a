//! Symbol variants tried during a fetch and the offline name resolver.

use crate::config::EXCHANGE_SUFFIXES;
use crate::error::Result;

use super::TickerResolver;

/// One way of turning a resolved ticker into a provider symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolVariant {
    /// Append an exchange suffix such as `.NS`.
    Suffix(&'static str),
    /// Use the ticker unchanged.
    Raw,
}

impl SymbolVariant {
    /// Variants in the order they are tried: each exchange suffix, then raw.
    pub fn fallback_order() -> Vec<SymbolVariant> {
        EXCHANGE_SUFFIXES
            .iter()
            .map(|s| SymbolVariant::Suffix(*s))
            .chain(std::iter::once(SymbolVariant::Raw))
            .collect()
    }

    pub fn apply(&self, ticker: &str) -> String {
        match self {
            SymbolVariant::Suffix(suffix) => format!("{}{}", ticker, suffix),
            SymbolVariant::Raw => ticker.to_string(),
        }
    }
}

/// Strip a known exchange suffix so the fallback order applies uniformly.
pub fn strip_exchange_suffix(symbol: &str) -> &str {
    EXCHANGE_SUFFIXES
        .iter()
        .find_map(|suffix| symbol.strip_suffix(*suffix))
        .unwrap_or(symbol)
}

/// Resolves a name by taking its first word, upper-cased.
///
/// Needs no network access: `"Reliance Industries"` resolves to
/// `RELIANCE`, `"tcs"` to `TCS`. Works when users type tickers or
/// single-word company names.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstTokenResolver;

impl TickerResolver for FirstTokenResolver {
    fn resolve(&self, name: &str) -> Result<Option<String>> {
        Ok(name
            .split(|c: char| c.is_whitespace() || c == ',')
            .find(|t| !t.is_empty())
            .map(|t| t.to_uppercase()))
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use super::period::Period;
use super::series::{AlignedReturn, PriceSeries, ReturnSeries};

// ---------------------------------------------------------------------------
// Metrics — scalar results of one analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub cagr: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
    pub beta: f64,
}

// ---------------------------------------------------------------------------
// BetaClass — three-way reading of beta against 1.0
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetaClass {
    Aggressive,
    Defensive,
    TracksMarket,
}

impl BetaClass {
    /// Exact comparison against 1.0; only a beta of exactly 1.0 tracks the
    /// market.
    pub fn classify(beta: f64) -> Self {
        if beta > 1.0 {
            BetaClass::Aggressive
        } else if beta < 1.0 {
            BetaClass::Defensive
        } else {
            BetaClass::TracksMarket
        }
    }

    /// Banded variant: betas within `tolerance` of 1.0 track the market.
    pub fn classify_with_tolerance(beta: f64, tolerance: f64) -> Self {
        if (beta - 1.0).abs() <= tolerance.abs() {
            BetaClass::TracksMarket
        } else {
            Self::classify(beta)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BetaClass::Aggressive => "Aggressive (more volatile than market)",
            BetaClass::Defensive => "Defensive (less volatile than market)",
            BetaClass::TracksMarket => "Moves with the market",
        }
    }
}

impl fmt::Display for BetaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Analysis — everything shown for one company
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub company_name: String,
    /// Symbol returned by the resolver, before any exchange suffix.
    pub ticker: String,
    /// Symbol variant that actually produced price data (e.g. `TCS.NS`).
    pub symbol: String,
    pub market_index: String,
    pub period: Period,
    pub metrics: Metrics,
    pub beta_class: BetaClass,
    pub prices: PriceSeries,
    pub cumulative_returns: ReturnSeries,
    pub aligned_returns: Vec<AlignedReturn>,
}

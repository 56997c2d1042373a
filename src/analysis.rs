//! Turns a stock history and a market history into an [`Analysis`].

use crate::error::{AnalyzerError, Result};
use crate::metrics;
use crate::models::{Analysis, Metrics, Period, PriceSeries};

/// Inputs for one analysis, already fetched.
#[derive(Debug, Clone)]
pub struct AnalysisInput<'a> {
    pub company_name: &'a str,
    pub ticker: &'a str,
    pub symbol: &'a str,
    pub market_index: &'a str,
    pub period: Period,
    pub prices: &'a PriceSeries,
    pub market: &'a PriceSeries,
}

/// Clean both series and run every metric.
///
/// Order matches what is displayed: returns, cumulative returns, CAGR,
/// volatility and drawdown for the stock, then market returns, alignment and
/// beta.
pub fn compute(input: AnalysisInput<'_>) -> Result<Analysis> {
    let prices = input.prices.cleaned();
    if prices.is_empty() {
        return Err(AnalyzerError::EmptyData(input.ticker.to_string()));
    }

    let returns = metrics::daily_returns(&prices)?;
    let cumulative_returns = metrics::cumulative_returns(&returns);
    let cagr = metrics::cagr(&prices)?;
    let volatility = metrics::volatility(&returns)?;
    let max_drawdown = metrics::max_drawdown(&prices)?;

    let market = input.market.cleaned();
    if market.is_empty() {
        return Err(AnalyzerError::EmptyData(input.market_index.to_string()));
    }
    let market_returns = metrics::daily_returns(&market)?;

    let aligned_returns = metrics::align(&returns, &market_returns);
    let beta = metrics::beta_from_aligned(&aligned_returns)?;
    let beta_class = metrics::interpret_beta(beta);

    Ok(Analysis {
        company_name: input.company_name.to_string(),
        ticker: input.ticker.to_string(),
        symbol: input.symbol.to_string(),
        market_index: input.market_index.to_string(),
        period: input.period,
        metrics: Metrics {
            cagr,
            volatility,
            max_drawdown,
            beta,
        },
        beta_class,
        prices,
        cumulative_returns,
        aligned_returns,
    })
}

//! Risk and return statistics over daily price series.
//!
//! Every function here is pure: no I/O, no shared state. Degenerate inputs
//! (too few points, zero starting price, zero market variance, no common
//! dates) come back as errors instead of NaN.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::TRADING_DAYS_PER_YEAR;
use crate::error::{AnalyzerError, Result};
use crate::models::{AlignedReturn, BetaClass, PriceSeries, ReturnPoint, ReturnSeries};

/// Day-over-day fractional change, dated at the later day.
///
/// The first price has no predecessor, so the result is one shorter than
/// `prices`. Requires at least two prices.
pub fn daily_returns(prices: &PriceSeries) -> Result<ReturnSeries> {
    if prices.len() < 2 {
        return Err(AnalyzerError::InsufficientData {
            needed: 2,
            got: prices.len(),
        });
    }

    let points = prices
        .points()
        .windows(2)
        .map(|w| ReturnPoint {
            date: w[1].date,
            value: w[1].close / w[0].close - 1.0,
        })
        .collect();

    Ok(ReturnSeries::from_sorted(points))
}

/// Compound returns from the start of the series: `∏(1 + r) - 1`.
///
/// The first value is the first return itself.
pub fn cumulative_returns(returns: &ReturnSeries) -> ReturnSeries {
    let mut growth = 1.0;
    let points = returns
        .points()
        .iter()
        .map(|p| {
            growth *= 1.0 + p.value;
            ReturnPoint {
                date: p.date,
                value: growth - 1.0,
            }
        })
        .collect();

    ReturnSeries::from_sorted(points)
}

/// Compound annual growth rate with `years = len / 252`.
pub fn cagr(prices: &PriceSeries) -> Result<f64> {
    let (first, last) = match (prices.first(), prices.last()) {
        (Some(first), Some(last)) => (first.close, last.close),
        _ => return Err(AnalyzerError::InsufficientData { needed: 1, got: 0 }),
    };
    if first == 0.0 {
        return Err(AnalyzerError::InvalidPrice(first));
    }

    let years = prices.len() as f64 / TRADING_DAYS_PER_YEAR;
    Ok((last / first).powf(1.0 / years) - 1.0)
}

/// Annualized volatility: sample standard deviation × √252.
pub fn volatility(returns: &ReturnSeries) -> Result<f64> {
    let values = returns.values();
    let variance = sample_variance(&values)?;
    Ok(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Decline from the running peak at each date, as a fraction (≤ 0).
pub fn drawdown_series(prices: &PriceSeries) -> ReturnSeries {
    let mut peak = f64::NEG_INFINITY;
    let points = prices
        .points()
        .iter()
        .map(|p| {
            peak = peak.max(p.close);
            ReturnPoint {
                date: p.date,
                value: p.close / peak - 1.0,
            }
        })
        .collect();

    ReturnSeries::from_sorted(points)
}

/// Most negative drawdown over the series; 0 when prices never fall.
pub fn max_drawdown(prices: &PriceSeries) -> Result<f64> {
    if prices.is_empty() {
        return Err(AnalyzerError::InsufficientData { needed: 1, got: 0 });
    }

    Ok(drawdown_series(prices)
        .points()
        .iter()
        .map(|p| p.value)
        .fold(0.0, f64::min))
}

/// Inner join of two return series on date, ascending.
pub fn align(stock: &ReturnSeries, market: &ReturnSeries) -> Vec<AlignedReturn> {
    let market_by_date: HashMap<NaiveDate, f64> = market
        .points()
        .iter()
        .map(|p| (p.date, p.value))
        .collect();

    stock
        .points()
        .iter()
        .filter_map(|p| {
            market_by_date.get(&p.date).map(|&m| AlignedReturn {
                date: p.date,
                stock: p.value,
                market: m,
            })
        })
        .collect()
}

/// `cov(stock, market) / var(market)` over the dates both series share.
///
/// Covariance and variance both use the sample (n - 1) denominator, so a
/// series measured against itself has a beta of exactly 1.
pub fn beta(stock: &ReturnSeries, market: &ReturnSeries) -> Result<f64> {
    beta_from_aligned(&align(stock, market))
}

/// Beta over rows that are already date-aligned.
pub fn beta_from_aligned(rows: &[AlignedReturn]) -> Result<f64> {
    if rows.len() < 2 {
        return Err(AnalyzerError::NoOverlap);
    }

    let n = rows.len() as f64;
    let stock_mean = rows.iter().map(|r| r.stock).sum::<f64>() / n;
    let market_mean = rows.iter().map(|r| r.market).sum::<f64>() / n;

    let covariance = rows
        .iter()
        .map(|r| (r.stock - stock_mean) * (r.market - market_mean))
        .sum::<f64>()
        / (n - 1.0);
    let variance = rows
        .iter()
        .map(|r| (r.market - market_mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);

    if variance == 0.0 {
        return Err(AnalyzerError::ZeroVariance);
    }
    Ok(covariance / variance)
}

pub fn interpret_beta(beta: f64) -> BetaClass {
    BetaClass::classify(beta)
}

fn sample_variance(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(AnalyzerError::InsufficientData {
            needed: 2,
            got: values.len(),
        });
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    Ok(values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0))
}

//! Yahoo Finance client for symbol search and daily price history.

use chrono::{DateTime, NaiveDate};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config;
use crate::error::{AnalyzerError, Result};
use crate::models::{Period, PriceSeries};

use super::symbol::strip_exchange_suffix;
use super::{PriceProvider, TickerResolver};

/// Error code Yahoo returns for unknown or delisted symbols.
const NOT_FOUND_CODE: &str = "Not Found";

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
    adjclose: Option<Vec<AdjCloseColumn>>,
}

#[derive(Debug, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseColumn {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuote {
    symbol: Option<String>,
    quote_type: Option<String>,
}

// ---------------------------------------------------------------------------
// YahooClient
// ---------------------------------------------------------------------------

/// Blocking Yahoo Finance client.
///
/// Resolves company names through the search endpoint and downloads daily
/// closes through the chart endpoint. Closes are split/dividend adjusted
/// when Yahoo supplies an adjusted column.
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    chart_base: String,
    search_base: String,
}

impl YahooClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_urls(timeout, config::CHART_BASE, config::SEARCH_BASE)
    }

    /// Create a client pointed at alternative endpoints (mirrors, test servers).
    pub fn with_base_urls(timeout: Duration, chart_base: &str, search_base: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config::USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            chart_base: chart_base.trim_end_matches('/').to_string(),
            search_base: search_base.to_string(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/{}", self.chart_base, symbol)
    }
}

impl PriceProvider for YahooClient {
    fn fetch(&self, symbol: &str, period: Period) -> Result<PriceSeries> {
        let url = self.chart_url(symbol);
        debug!(%url, %period, "requesting price history");

        let resp = self
            .client
            .get(&url)
            .query(&[("range", period.as_str()), ("interval", "1d")])
            .send()?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!(symbol, "symbol not found");
            return Ok(PriceSeries::default());
        }
        let body = resp.error_for_status()?.text()?;
        parse_chart(&body)
    }
}

impl TickerResolver for YahooClient {
    fn resolve(&self, name: &str) -> Result<Option<String>> {
        let count = config::SEARCH_QUOTES_COUNT.to_string();
        let body = self
            .client
            .get(&self.search_base)
            .query(&[("q", name), ("quotesCount", count.as_str()), ("newsCount", "0")])
            .send()?
            .error_for_status()?
            .text()?;
        parse_search(&body)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn parse_chart(body: &str) -> Result<PriceSeries> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(error) = response.chart.error {
        if error.code == NOT_FOUND_CODE {
            return Ok(PriceSeries::default());
        }
        return Err(AnalyzerError::Api {
            code: error.code,
            description: error.description,
        });
    }

    let data = match response.chart.result.and_then(|r| r.into_iter().next()) {
        Some(data) => data,
        None => return Ok(PriceSeries::default()),
    };

    let adjusted = data
        .indicators
        .adjclose
        .as_ref()
        .and_then(|a| a.first())
        .map(|a| a.adjclose.as_slice());
    let raw = data
        .indicators
        .quote
        .first()
        .map(|q| q.close.as_slice())
        .unwrap_or(&[]);
    let closes = adjusted.unwrap_or(raw);

    let offset = data.meta.gmtoffset;
    let pairs = data.timestamp.iter().enumerate().filter_map(|(i, &ts)| {
        let close = closes.get(i).copied().flatten()?;
        Some((exchange_date(ts, offset)?, close))
    });

    Ok(PriceSeries::from_pairs(pairs))
}

fn parse_search(body: &str) -> Result<Option<String>> {
    let response: SearchResponse = serde_json::from_str(body)?;

    let equity = response
        .quotes
        .iter()
        .find(|q| q.quote_type.as_deref() == Some("EQUITY") && q.symbol.is_some());
    let chosen = equity.or_else(|| response.quotes.iter().find(|q| q.symbol.is_some()));

    Ok(chosen
        .and_then(|q| q.symbol.as_deref())
        .map(|s| strip_exchange_suffix(s).to_string()))
}

/// Trading date in the exchange's own timezone.
fn exchange_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

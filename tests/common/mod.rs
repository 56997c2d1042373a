//! Shared fixtures for the integration tests.
//!
//! Provides stub resolvers and price providers that never touch the network,
//! helpers for building dated price series, and a loopback HTTP server for
//! exercising the Yahoo client.

#![allow(dead_code)]

use chrono::{Duration as ChronoDuration, NaiveDate};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use stock_risk::{
    MemoryCache, Period, PriceProvider, PriceSeries, Result, StockAnalyzer, TickerResolver,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting at 2024-01-01.
pub fn series(closes: &[f64]) -> PriceSeries {
    series_from(date(2024, 1, 1), closes)
}

pub fn series_from(start: NaiveDate, closes: &[f64]) -> PriceSeries {
    PriceSeries::from_pairs(
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (start + ChronoDuration::days(i as i64), c)),
    )
}

/// A deterministic, non-monotonic price path of `n` points.
pub fn wavy(n: usize, base: f64) -> Vec<f64> {
    (0..n)
        .map(|i| base * (1.0 + 0.001 * i as f64) * (1.0 + 0.02 * ((i as f64) * 0.7).sin()))
        .collect()
}

// ---------------------------------------------------------------------------
// Stub resolver
// ---------------------------------------------------------------------------

/// Resolves names from a fixed table.
pub struct TableResolver {
    table: HashMap<String, String>,
}

impl TableResolver {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl TickerResolver for TableResolver {
    fn resolve(&self, name: &str) -> Result<Option<String>> {
        Ok(self.table.get(name).cloned())
    }
}

// ---------------------------------------------------------------------------
// Stub provider
// ---------------------------------------------------------------------------

/// Serves fixed series per symbol and records every request.
///
/// Unknown symbols return an empty series, like a real provider.
#[derive(Clone, Default)]
pub struct StubProvider {
    data: Arc<HashMap<String, PriceSeries>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubProvider {
    pub fn new(entries: Vec<(&str, PriceSeries)>) -> Self {
        Self {
            data: Arc::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            ),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Symbols requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PriceProvider for StubProvider {
    fn fetch(&self, symbol: &str, _period: Period) -> Result<PriceSeries> {
        self.calls.lock().unwrap().push(symbol.to_string());
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

/// Analyzer wired to stubs with an in-memory cache and no throttling.
pub fn analyzer(resolver: TableResolver, provider: StubProvider) -> StockAnalyzer {
    StockAnalyzer::builder()
        .resolver(resolver)
        .provider(provider)
        .cache(MemoryCache::new())
        .fetch_interval(Duration::ZERO)
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Local HTTP server
// ---------------------------------------------------------------------------

/// A canned HTTP response: status code and JSON body.
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Serves exactly `requests` HTTP requests on a loopback port, one
/// connection each, answering through `route`.
///
/// Joining the handle returns the request targets (path plus query string)
/// in the order they arrived.
pub struct LocalServer {
    pub base: String,
    handle: JoinHandle<Vec<String>>,
}

impl LocalServer {
    pub fn start<F>(requests: usize, route: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let mut targets = Vec::new();
            for _ in 0..requests {
                let (mut stream, _) = listener.accept().unwrap();
                let target = read_request_target(&mut stream);
                let reply = route(&target);
                write_reply(&mut stream, &reply);
                targets.push(target);
            }
            targets
        });
        Self { base, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Wait for every expected request and return their targets.
    pub fn finish(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn read_request_target(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    let head = String::from_utf8_lossy(&head);
    // "GET /path?query HTTP/1.1"
    head.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}

fn write_reply(stream: &mut TcpStream, reply: &Reply) {
    let reason = match reply.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reason,
        reply.body.len(),
        reply.body
    );
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();
}

/// Yahoo chart response for daily closes starting 2024-01-01 09:15 IST.
pub fn chart_body(closes: &[f64]) -> String {
    let first = 1_704_080_700_i64;
    let timestamps: Vec<i64> = (0..closes.len() as i64).map(|i| first + i * 86_400).collect();
    serde_json::json!({
        "chart": {
            "result": [{
                "meta": {"gmtoffset": 19800},
                "timestamp": timestamps,
                "indicators": {"quote": [{"close": closes}]}
            }],
            "error": null
        }
    })
    .to_string()
}

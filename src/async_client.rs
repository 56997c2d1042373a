//! Async wrapper around [`StockAnalyzer`] for use in async runtimes (Tokio, etc.).
//!
//! The analyzer does blocking HTTP and sleeps between requests, so every
//! call is moved onto Tokio's blocking pool via
//! [`tokio::task::spawn_blocking`].
//!
//! # Example
//!
//! ```no_run
//! use stock_risk::{AsyncStockAnalyzer, StockAnalyzer};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let analyzer = AsyncStockAnalyzer::build(StockAnalyzer::builder()).await.unwrap();
//!     let analysis = analyzer.analyze("Infosys").await.unwrap();
//!     println!("beta = {:.2}", analysis.metrics.beta);
//!     analyzer.close().await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};

use crate::error::{AnalyzerError, Result};
use crate::models::Analysis;
use crate::{StockAnalyzer, StockAnalyzerBuilder};

/// Async wrapper around [`StockAnalyzer`].
///
/// The inner analyzer is behind a [`Mutex`] because its cache and throttle
/// use interior mutability; analyses therefore run one at a time.
pub struct AsyncStockAnalyzer {
    inner: Arc<Mutex<StockAnalyzer>>,
}

impl AsyncStockAnalyzer {
    /// Build the analyzer on the blocking pool.
    ///
    /// The blocking HTTP client must not be constructed on an async worker
    /// thread.
    pub async fn build(builder: StockAnalyzerBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || {
            let analyzer = builder.build()?;
            Ok(AsyncStockAnalyzer {
                inner: Arc::new(Mutex::new(analyzer)),
            })
        })
        .await
        .map_err(|e| AnalyzerError::Task(format!("join error: {e}")))?
    }

    /// Run a sync analyzer operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StockAnalyzer) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let analyzer = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = analyzer
                .lock()
                .map_err(|_| AnalyzerError::Task("analyzer lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| AnalyzerError::Task(format!("join error: {e}")))?
    }

    /// Run a full analysis for one company.
    pub async fn analyze(&self, company_name: &str) -> Result<Analysis> {
        let name = company_name.to_string();
        self.run(move |a| a.analyze(&name)).await
    }

    /// Resolve a company name to a ticker.
    pub async fn resolve(&self, company_name: &str) -> Result<String> {
        let name = company_name.to_string();
        self.run(move |a| a.resolve(&name)).await
    }

    /// Drop the analyzer on the blocking pool, where its HTTP client may be
    /// torn down safely.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || drop(self.inner))
            .await
            .map_err(|e| AnalyzerError::Task(format!("join error: {e}")))
    }
}

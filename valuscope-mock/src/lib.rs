//! Mock series sources for valuscope tests and examples.
//!
//! [`MockSource`] serves deterministic fixtures. A few reserved codes trigger
//! failure paths: `"FAIL"` always errors and `"TIMEOUT"` sleeps long enough to
//! trip a short orchestrator timeout. [`DynamicMockSource`] hands control to a
//! test through its controller.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use valuscope_core::{SeriesSource, Table, TimeSeries, ValuationMetric, ValuscopeError};

mod dynamic;
pub mod fixtures;

pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior};

/// Mock source for CI-safe examples. Provides deterministic data from generated fixtures.
pub struct MockSource {
    transient_failures: AtomicU32,
    calls: AtomicU32,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transient_failures: AtomicU32::new(0),
            calls: AtomicU32::new(0),
        }
    }

    /// Fail the next `n` calls with a retrieval error before serving fixtures.
    #[must_use]
    pub const fn failing_first(n: u32) -> Self {
        Self {
            transient_failures: AtomicU32::new(n),
            calls: AtomicU32::new(0),
        }
    }

    /// Number of calls received so far, failed ones included.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn not_found(what: &str) -> ValuscopeError {
        ValuscopeError::retrieval("valuscope-mock", format!("no fixture for {what}"))
    }

    async fn maybe_fail_or_timeout(&self, code: &str, capability: &'static str) -> Result<(), ValuscopeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pending = self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if pending.is_ok() {
            return Err(ValuscopeError::retrieval(
                "valuscope-mock",
                format!("transient failure: {capability}"),
            ));
        }
        match code {
            "FAIL" => Err(ValuscopeError::retrieval(
                "valuscope-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SeriesSource for MockSource {
    fn name(&self) -> &'static str {
        "valuscope-mock"
    }

    async fn price_history(&self, code: &str, start: NaiveDate, end: NaiveDate) -> Result<Table, ValuscopeError> {
        self.maybe_fail_or_timeout(code, "price_history").await?;
        fixtures::stock_prices(code, start, end)
    }

    async fn index_history(&self, code: &str) -> Result<Table, ValuscopeError> {
        self.maybe_fail_or_timeout(code, "index_history").await?;
        fixtures::index_prices(code).ok_or_else(|| Self::not_found(&format!("index {code}")))?
    }

    async fn valuation(&self, metric: ValuationMetric, universe: &str) -> Result<TimeSeries, ValuscopeError> {
        self.maybe_fail_or_timeout(universe, "valuation").await?;
        fixtures::valuation(metric, universe)
            .ok_or_else(|| Self::not_found(&format!("{metric} of {universe}")))
    }

    async fn roe(&self, code: &str) -> Result<TimeSeries, ValuscopeError> {
        self.maybe_fail_or_timeout(code, "roe").await?;
        Ok(fixtures::roe(code))
    }
}

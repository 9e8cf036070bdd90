use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::ValuscopeError;
use crate::table::Table;
use crate::timeseries::series::TimeSeries;

/// Valuation ratio tracked for an index universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValuationMetric {
    /// Price to earnings.
    Pe,
    /// Price to book.
    Pb,
}

impl ValuationMetric {
    /// Column name the metric is published under.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Pe => "pe",
            Self::Pb => "pb",
        }
    }
}

impl fmt::Display for ValuationMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for ValuationMetric {
    type Err = ValuscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pe" => Ok(Self::Pe),
            "pb" => Ok(Self::Pb),
            other => Err(ValuscopeError::InvalidArg(format!("unknown valuation metric '{other}'"))),
        }
    }
}

/// A provider of raw financial series.
///
/// Implementations only retrieve; every transformation happens in the engine.
/// Tables returned by the history methods carry a `date` column (see
/// [`crate::DATE_COLUMN`]) plus whatever price columns the provider publishes.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Stable name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Daily price history of a single stock between `start` and `end`, inclusive.
    async fn price_history(&self, code: &str, start: NaiveDate, end: NaiveDate) -> Result<Table, ValuscopeError>;

    /// Full daily price history of an index.
    async fn index_history(&self, code: &str) -> Result<Table, ValuscopeError>;

    /// Valuation ratio history of an index universe (for example `"沪深300"`),
    /// or of a single stock when `universe` is a stock code.
    async fn valuation(&self, metric: ValuationMetric, universe: &str) -> Result<TimeSeries, ValuscopeError>;

    /// Return-on-equity history of a stock, one value per reporting date.
    async fn roe(&self, code: &str) -> Result<TimeSeries, ValuscopeError>;
}

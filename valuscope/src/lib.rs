//! Valuscope computes valuation percentiles and merges financial series from
//! pluggable data sources.
//!
//! Overview
//! - Fetches raw series through the `valuscope_core::SeriesSource` trait, with
//!   a per-attempt timeout and a bounded, fixed-delay retry around every call.
//! - Runs the valuation path on PE/PB histories: 3-sigma outlier removal,
//!   gap filling, and a trailing-window percentile rank.
//! - Attaches derived and raw series to a price calendar by backward as-of
//!   match, so no row ever sees a value dated after it.
//! - Filters tabular results with typed predicate conditions.
//!
//! Key behaviors
//! - Too few observations in a window is not an error: the percentile is
//!   missing during warm-up and smoothed over afterwards.
//! - Structural problems (missing column, unknown operator, malformed filter)
//!   abort the call with no partial output.
//! - Several sources can be registered; the next one is used only when the
//!   current one exhausted its retries.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use valuscope::{Valuscope, ValuationMetric};
//!
//! let vs = Valuscope::builder()
//!     .with_source(Arc::new(MySource::new()))
//!     .window(1260)
//!     .min_samples(60)
//!     .build()?;
//!
//! let pe = vs.valuation(ValuationMetric::Pe, Some("沪深300")).await?;
//! let index = vs.index_indicator("sh000300", None).await?;
//! let stock = vs.stock_snapshot("600519", start, end).await?;
//! ```
//!
//! Filtering records:
//! ```rust,ignore
//! use valuscope::{FilterCondition, Record};
//!
//! let rows = vec![Record::new().with("code", "600519").with("pe", 30.0)];
//! let cheap = vs.filter_records(rows, vec![FilterCondition::new("pe", "lt", 20.0)], "and")?;
//! ```
//!
//! See `valuscope/examples/` for a runnable demonstration.
#![warn(missing_docs)]

pub(crate) mod core;
mod router;

pub use core::{Valuscope, ValuscopeBuilder};

// Re-export core types for convenience
pub use valuscope_core::{
    AlignedTable, AsOfColumn, Column, CombineMode, DATE_COLUMN, DataType, FilterCondition,
    FilterSet, Operator, PercentileConfig, PercentileFrame, Record, RetryConfig, SeriesSource,
    Table, TimeSeries, ValuationMetric, Value, ValuscopeConfig, ValuscopeError,
};

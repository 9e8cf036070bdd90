//! valuscope-core
//!
//! The computation engine behind valuscope. Everything here is synchronous,
//! pure, and in-memory: each call borrows its inputs and returns a new
//! series or table.
//!
//! - `table`: column-oriented `Table` with conversion to and from row records.
//! - `timeseries`: `TimeSeries`, outlier removal, gap filling, as-of alignment,
//!   and rolling percentile ranks.
//! - `filter`: predicate-based record filtering.
//! - `source`: the `SeriesSource` trait implemented by data providers.
#![warn(missing_docs)]

/// Predicate-based filtering over tables and row records.
pub mod filter;
/// Async trait for the external providers that supply raw series.
pub mod source;
/// Column-oriented tables and date parsing.
pub mod table;
/// Time-series model and transformations.
pub mod timeseries;
pub mod types;

/// Name of the date column in every table produced by the engine.
pub const DATE_COLUMN: &str = "date";

pub use filter::{DataType, Operator, apply_filters, filter_records};
pub use source::{SeriesSource, ValuationMetric};
pub use table::{Column, Table, parse_date};
pub use timeseries::align::{AlignedTable, AsOfColumn, align};
pub use timeseries::gaps::{
    backward_fill, fill_gaps, fill_with_median, forward_fill, interpolate_linear,
    interpolate_time, replace_non_finite,
};
pub use timeseries::outlier::{filter_outliers, sigma_band};
pub use timeseries::percentile::{
    PercentileFrame, percentile_pipeline, percentile_rank, rolling_percentile,
};
pub use timeseries::series::TimeSeries;
pub use types::*;

//! Time-series utilities behind the valuation percentile path.
//!
//! Modules include:
//! - `series`: the `TimeSeries` model (unique, ascending dates)
//! - `outlier`: σ-band outlier removal
//! - `gaps`: gap-filling primitives and the fixed-order fill strategy
//! - `align`: backward as-of joins onto a primary calendar
//! - `percentile`: trailing-window percentile ranks
/// Backward as-of alignment of secondary series onto a primary calendar.
pub mod align;
/// Missing-value filling strategies.
pub mod gaps;
/// Outlier removal by standard-deviation band.
pub mod outlier;
/// Rolling percentile rank and the full valuation percentile pipeline.
pub mod percentile;
/// The `TimeSeries` model.
pub mod series;

use std::collections::VecDeque;

use super::gaps::{fill_gaps, smooth_positional};
use super::outlier::filter_outliers;
use super::series::TimeSeries;
use crate::table::{Column, Table};
use crate::{PercentileConfig, ValuscopeError};

/// Raw trailing-window percentile rank, one entry per input value.
///
/// The window at `i` holds up to `window` most recent valid (present, finite)
/// observations ending at and including `i`. With `current` the value at `i`
/// and `history` the rest of the window, the rank is
/// `100 * |{h in history : h < current}| / |history|`. Ties do not count.
///
/// The entry is `None` when the value at `i` is not valid, when the window
/// holds fewer than `min_samples` observations, or when there is no history.
#[must_use]
pub fn rolling_percentile(values: &[Option<f64>], window: usize, min_samples: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    // arrival order, for eviction
    let mut arrivals: VecDeque<f64> = VecDeque::with_capacity(window);
    // same values, kept sorted by total order
    let mut sorted: Vec<f64> = Vec::with_capacity(window);
    let mut out = Vec::with_capacity(values.len());

    for v in values {
        let Some(current) = v.filter(|x| x.is_finite()) else {
            out.push(None);
            continue;
        };
        if arrivals.len() == window
            && let Some(evicted) = arrivals.pop_front()
        {
            let at = sorted.partition_point(|s| s.total_cmp(&evicted).is_lt());
            sorted.remove(at);
        }
        arrivals.push_back(current);
        let at = sorted.partition_point(|s| s.total_cmp(&current).is_lt());
        sorted.insert(at, current);

        let n = sorted.len();
        if n < min_samples || n < 2 {
            out.push(None);
            continue;
        }
        // current itself is never strictly below current
        let below = sorted.partition_point(|s| *s < current);
        out.push(Some(100.0 * below as f64 / (n - 1) as f64));
    }
    out
}

/// Percentile rank series named `<name>_percentile`, smoothed to a dense column.
///
/// Warm-up rows and other gaps in the raw rank are filled by positional
/// linear interpolation, then forward fill, then backward fill.
///
/// # Errors
/// Returns `InvalidArg` if `window` is zero.
pub fn percentile_rank(series: &TimeSeries, window: usize, min_samples: usize) -> Result<TimeSeries, ValuscopeError> {
    if window == 0 {
        return Err(ValuscopeError::InvalidArg("percentile window must be positive".into()));
    }
    let raw = rolling_percentile(series.values(), window, min_samples);
    let name = format!("{}_percentile", series.name());
    Ok(series.with_values(smooth_positional(&raw)).renamed(name))
}

/// Output of [`percentile_pipeline`]: the cleaned value series and its rank.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileFrame {
    /// Outlier-filtered, gap-filled values.
    pub values: TimeSeries,
    /// Smoothed percentile rank, sharing the dates of `values`.
    pub percentile: TimeSeries,
}

impl PercentileFrame {
    /// Three-column table: `date_column`, the value column, and its percentile column.
    ///
    /// # Errors
    /// Never fails for frames built by [`percentile_pipeline`]; height
    /// mismatches are reported as `Data`.
    pub fn to_table(&self, date_column: &str) -> Result<Table, ValuscopeError> {
        self.values.to_table(date_column).with_column(
            self.percentile.name(),
            Column::Float(self.percentile.values().to_vec()),
        )
    }
}

/// Run the valuation percentile path on a raw series:
/// outlier removal, gap filling, rolling percentile rank.
///
/// # Errors
/// Returns `InvalidArg` if `cfg` does not validate.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "valuscope_core::percentile_pipeline",
        skip(series),
        fields(series = series.name(), rows = series.len(), window = cfg.window),
    )
)]
pub fn percentile_pipeline(series: &TimeSeries, cfg: &PercentileConfig) -> Result<PercentileFrame, ValuscopeError> {
    cfg.validate()?;
    let filtered = filter_outliers(series, cfg.sigma);
    let values = fill_gaps(&filtered);
    let percentile = percentile_rank(&values, cfg.window, cfg.min_samples)?;
    Ok(PercentileFrame { values, percentile })
}

//! Gap filling.
//!
//! Two policies live side by side:
//! - [`fill_gaps`] is the percentile preprocessing policy: non-finite values
//!   become missing, interior gaps are interpolated in calendar time, then
//!   forward fill, then backward fill.
//! - Columns merged by as-of alignment only ever get [`forward_fill`]; they
//!   are never interpolated.

use chrono::NaiveDate;

use super::series::TimeSeries;

/// Map ±∞ and NaN to missing.
#[must_use]
pub fn replace_non_finite(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values.iter().map(|v| v.filter(|x| x.is_finite())).collect()
}

/// Linear interpolation of interior gaps against arbitrary positions.
///
/// Only gaps bracketed by two finite values are filled; leading and trailing
/// gaps are left untouched.
fn interpolate_at(values: &[Option<f64>], positions: &[f64]) -> Vec<Option<f64>> {
    debug_assert_eq!(values.len(), positions.len());
    let mut out = values.to_vec();
    let mut prev: Option<usize> = None;
    for (j, v) in values.iter().enumerate() {
        let Some(vj) = v.filter(|x| x.is_finite()) else {
            continue;
        };
        if let Some(i) = prev
            && j > i + 1
            && let Some(vi) = values[i]
        {
            let span = positions[j] - positions[i];
            for (k, slot) in out.iter_mut().enumerate().take(j).skip(i + 1) {
                if slot.is_none() {
                    let t = (positions[k] - positions[i]) / span;
                    *slot = Some(vi + (vj - vi) * t);
                }
            }
        }
        prev = Some(j);
    }
    out
}

/// Interpolate interior gaps in proportion to elapsed calendar days.
#[must_use]
pub fn interpolate_time(dates: &[NaiveDate], values: &[Option<f64>]) -> Vec<Option<f64>> {
    let Some(&origin) = dates.first() else {
        return Vec::new();
    };
    let positions: Vec<f64> = dates
        .iter()
        .map(|d| (*d - origin).num_days() as f64)
        .collect();
    interpolate_at(values, &positions)
}

/// Interpolate interior gaps in proportion to row distance.
#[must_use]
pub fn interpolate_linear(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let positions: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    interpolate_at(values, &positions)
}

/// Propagate the last present value forward over missing cells.
#[must_use]
pub fn forward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last: Option<f64> = None;
    values
        .iter()
        .map(|v| {
            if v.is_some() {
                last = *v;
            }
            last
        })
        .collect()
}

/// Propagate the next present value backward over missing cells.
#[must_use]
pub fn backward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut next: Option<f64> = None;
    let mut out: Vec<Option<f64>> = values
        .iter()
        .rev()
        .map(|v| {
            if v.is_some() {
                next = *v;
            }
            next
        })
        .collect();
    out.reverse();
    out
}

/// Replace missing cells with the median of the finite values.
///
/// With an even count the median is the mean of the two middle values. A
/// column with no finite value is returned unchanged.
#[must_use]
pub fn fill_with_median(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut finite: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return values.to_vec();
    }
    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    let median = if finite.len() % 2 == 1 {
        finite[mid]
    } else {
        f64::midpoint(finite[mid - 1], finite[mid])
    };
    values.iter().map(|v| Some(v.unwrap_or(median))).collect()
}

/// Positional smoothing used on derived columns: linear interpolation,
/// forward fill, backward fill.
pub(crate) fn smooth_positional(values: &[Option<f64>]) -> Vec<Option<f64>> {
    backward_fill(&forward_fill(&interpolate_linear(values)))
}

/// Fill every gap of a series in the fixed order: non-finite to missing,
/// time-weighted interpolation, forward fill, backward fill.
///
/// The result has no missing values unless the input had no finite value at all.
#[must_use]
pub fn fill_gaps(series: &TimeSeries) -> TimeSeries {
    let cleaned = replace_non_finite(series.values());
    let interpolated = interpolate_time(series.dates(), &cleaned);
    series.with_values(backward_fill(&forward_fill(&interpolated)))
}

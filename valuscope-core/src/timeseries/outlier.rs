use statrs::statistics::Statistics;

use super::gaps::replace_non_finite;
use super::series::TimeSeries;

/// Open band `(mean - k·σ, mean + k·σ)` over the present, finite values.
///
/// σ is the sample standard deviation. With fewer than two usable values the
/// bounds are NaN and no value can fall inside the band.
#[must_use]
pub fn sigma_band(values: &[Option<f64>], k: f64) -> (f64, f64) {
    let present: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    let mean = present.iter().mean();
    let std_dev = present.iter().std_dev();
    (mean - k * std_dev, mean + k * std_dev)
}

/// Drop every row holding a finite value outside the open `k`-sigma band.
///
/// Statistics are taken over the series as given, so this must run before
/// any gap filling. Missing rows keep their date, and non-finite values
/// become missing, so a later fill can interpolate them.
#[must_use]
pub fn filter_outliers(series: &TimeSeries, k: f64) -> TimeSeries {
    let (lower, upper) = sigma_band(series.values(), k);
    let kept = series.retain_rows(|v| match v {
        Some(x) if x.is_finite() => x > lower && x < upper,
        _ => true,
    });
    let kept = kept.with_values(replace_non_finite(kept.values()));

    #[cfg(feature = "tracing")]
    tracing::debug!(
        series = series.name(),
        lower,
        upper,
        removed = series.len() - kept.len(),
        "sigma band outlier filter"
    );

    kept
}

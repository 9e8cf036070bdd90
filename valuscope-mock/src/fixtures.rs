//! Deterministic fixture generators.
//!
//! Every series is a pure function of its code and the calendar, so repeated
//! calls return identical data.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use valuscope_core::{Column, DATE_COLUMN, Table, TimeSeries, ValuationMetric, ValuscopeError};

/// First date covered by index and valuation fixtures.
pub const HISTORY_START: NaiveDate = match NaiveDate::from_ymd_opt(2015, 1, 5) {
    Some(d) => d,
    None => panic!("invalid fixture start"),
};

/// Last date covered by index and valuation fixtures.
pub const HISTORY_END: NaiveDate = match NaiveDate::from_ymd_opt(2020, 12, 31) {
    Some(d) => d,
    None => panic!("invalid fixture end"),
};

/// Universes with valuation fixtures.
pub const UNIVERSES: &[&str] = &[
    "上证50", "沪深300", "上证380", "创业板50", "中证500", "上证180", "深证红利", "深证100",
    "中证1000", "上证红利", "中证100", "中证800",
];

/// Index codes with price fixtures.
pub const INDICES: &[&str] = &["sh000016", "sh000300", "sh000905", "sz399006"];

/// Date of the injected valuation spike (removed by the sigma filter).
pub const SPIKE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2019, 6, 3) {
    Some(d) => d,
    None => panic!("invalid spike date"),
};

/// Trading days (Monday to Friday) between `start` and `end`, inclusive.
pub fn weekdays(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut d = start;
    while d <= end {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(d);
        }
        match d.checked_add_days(Days::new(1)) {
            Some(next) => d = next,
            None => break,
        }
    }
    out
}

fn seed(code: &str) -> f64 {
    let sum: u32 = code.chars().map(u32::from).sum();
    f64::from(sum % 97) / 97.0
}

fn wave(i: usize, period: f64, phase: f64) -> f64 {
    (i as f64 / period + phase * std::f64::consts::TAU).sin()
}

fn price_table(code: &str, days: &[NaiveDate], base: f64) -> Result<Table, ValuscopeError> {
    let s = seed(code);
    let close: Vec<Option<f64>> = days
        .iter()
        .enumerate()
        .map(|(i, _)| Some(base * (1.0 + 0.25 * wave(i, 90.0, s) + 0.0004 * i as f64)))
        .collect();
    let open: Vec<Option<f64>> = close.iter().map(|c| c.map(|c| c * 0.995)).collect();
    let high: Vec<Option<f64>> = close.iter().map(|c| c.map(|c| c * 1.01)).collect();
    let low: Vec<Option<f64>> = close.iter().map(|c| c.map(|c| c * 0.985)).collect();
    let volume: Vec<Option<i64>> = (0..days.len())
        .map(|i| Some(1_000_000 + (i as i64 % 37) * 25_000))
        .collect();
    Table::new()
        .with_column(DATE_COLUMN, Column::Date(days.iter().copied().map(Some).collect()))?
        .with_column("open", Column::Float(open))?
        .with_column("high", Column::Float(high))?
        .with_column("low", Column::Float(low))?
        .with_column("close", Column::Float(close))?
        .with_column("volume", Column::Int(volume))
}

/// Daily bars for a stock between `start` and `end`.
pub fn stock_prices(code: &str, start: NaiveDate, end: NaiveDate) -> Result<Table, ValuscopeError> {
    price_table(code, &weekdays(start, end), 12.0 + 30.0 * seed(code))
}

/// Daily bars for a known index, `None` for an unknown code.
pub fn index_prices(code: &str) -> Option<Result<Table, ValuscopeError>> {
    INDICES
        .contains(&code)
        .then(|| price_table(code, &weekdays(HISTORY_START, HISTORY_END), 3_000.0))
}

/// Valuation ratio history with a spike, a few gaps, and a non-finite print.
pub fn valuation(metric: ValuationMetric, universe: &str) -> Option<TimeSeries> {
    if !UNIVERSES.contains(&universe) {
        return None;
    }
    let (level, amplitude) = match metric {
        ValuationMetric::Pe => (14.0, 3.0),
        ValuationMetric::Pb => (1.6, 0.35),
    };
    let s = seed(universe);
    let points = weekdays(HISTORY_START, HISTORY_END)
        .into_iter()
        .enumerate()
        .map(|(i, d)| {
            let v = if d == SPIKE_DATE {
                Some(level * 40.0)
            } else if i % 211 == 17 {
                None
            } else if i % 503 == 101 {
                Some(f64::INFINITY)
            } else {
                Some(level + amplitude * wave(i, 120.0, s) + 0.3 * amplitude * wave(i, 17.0, s))
            };
            (d, v)
        });
    Some(TimeSeries::new(metric.column(), points))
}

/// Quarterly ROE as a fraction, dated at each quarter end.
pub fn roe(code: &str) -> TimeSeries {
    let s = seed(code);
    let quarter_ends = (2014..=2020).flat_map(|y| [(y, 3, 31), (y, 6, 30), (y, 9, 30), (y, 12, 31)]);
    let points = quarter_ends
        .filter_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .enumerate()
        .map(|(i, d)| (d, Some(0.08 + 0.04 * wave(i, 3.0, s))));
    TimeSeries::new("roe", points)
}

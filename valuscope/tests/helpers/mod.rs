// Shared fixtures and builders for the router tests.
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use valuscope::{Column, DATE_COLUMN, SeriesSource, Table, Valuscope, ValuscopeBuilder};

/// Universe with valuation fixtures in `valuscope-mock`.
pub const HS300: &str = "沪深300";
/// Index code with price fixtures in `valuscope-mock`.
pub const CSI300_INDEX: &str = "sh000300";

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Builder with a short retry delay so failure paths stay fast.
pub fn fast_builder(source: Arc<dyn SeriesSource>) -> ValuscopeBuilder {
    Valuscope::builder()
        .with_source(source)
        .retry_delay(Duration::from_millis(1))
        .source_timeout(Duration::from_millis(100))
}

pub fn floats(table: &Table, column: &str) -> Vec<Option<f64>> {
    table.column(column).unwrap().to_f64().unwrap()
}

/// A price table over `dates` with a single `close` column.
#[allow(dead_code)]
pub fn price_table(dates: &[NaiveDate]) -> Table {
    Table::new()
        .with_column(DATE_COLUMN, Column::Date(dates.iter().copied().map(Some).collect()))
        .unwrap()
        .with_column(
            "close",
            Column::Float((0..dates.len()).map(|i| Some(10.0 + i as f64)).collect()),
        )
        .unwrap()
}

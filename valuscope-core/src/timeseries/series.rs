use chrono::NaiveDate;

use crate::table::{Column, Table};

/// A named series of `(date, value)` observations.
///
/// Dates are unique and strictly ascending. Values may be missing (`None`);
/// non-finite floats are kept as-is until a gap-filling step replaces them.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Build a series from observations in any order.
    ///
    /// Observations are sorted by date; when a date occurs more than once the
    /// last occurrence in input order wins.
    pub fn new<I>(name: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let mut points: Vec<(NaiveDate, Option<f64>)> = points.into_iter().collect();
        // stable: equal dates keep input order, so the last one is the latest seen
        points.sort_by_key(|(d, _)| *d);

        let mut dates: Vec<NaiveDate> = Vec::with_capacity(points.len());
        let mut values: Vec<Option<f64>> = Vec::with_capacity(points.len());
        for (d, v) in points {
            if dates.last() == Some(&d) {
                if let Some(slot) = values.last_mut() {
                    *slot = v;
                }
            } else {
                dates.push(d);
                values.push(v);
            }
        }
        Self {
            name: name.into(),
            dates,
            values,
        }
    }

    /// Build a series from fully observed points.
    pub fn from_points(name: impl Into<String>, points: &[(NaiveDate, f64)]) -> Self {
        Self::new(name, points.iter().map(|&(d, v)| (d, Some(v))))
    }

    /// Same dates, new values. Callers guarantee `values.len() == self.len()`.
    pub(crate) fn with_values(&self, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(values.len(), self.dates.len());
        Self {
            name: self.name.clone(),
            dates: self.dates.clone(),
            values,
        }
    }

    /// Keep only the rows for which `keep` returns true.
    pub(crate) fn retain_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(Option<f64>) -> bool,
    {
        let (dates, values) = self
            .dates
            .iter()
            .zip(&self.values)
            .filter(|&(_, v)| keep(*v))
            .map(|(d, v)| (*d, *v))
            .unzip();
        Self {
            name: self.name.clone(),
            dates,
            values,
        }
    }

    /// Return the series under a new name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Series name, used as the column name when materialised.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observation dates, strictly ascending.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observation values, aligned with [`TimeSeries::dates`].
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Iterate over `(date, value)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of missing values.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Materialise as a two-column table: `date_column` and the series name.
    #[must_use]
    pub fn to_table(&self, date_column: &str) -> Table {
        let mut table = Table::new();
        // both columns share the series length, so neither insert can fail
        let _ = table.set_column(date_column, Column::Date(self.dates.iter().copied().map(Some).collect()));
        let _ = table.set_column(self.name.clone(), Column::Float(self.values.clone()));
        table
    }
}

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::timeseries::series::TimeSeries;
use crate::{Record, ValuscopeError, Value};

/// Parse a calendar date from the textual forms providers commonly emit.
///
/// Accepted: `2024-01-31`, `20240131`, `2024/01/31`, `2024-01-31 15:00:00`,
/// and RFC 3339 timestamps (the date part is kept).
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

pub(crate) fn date_from_value(v: &Value) -> Result<Option<NaiveDate>, ValuscopeError> {
    match v {
        Value::Null => Ok(None),
        Value::Float(f) if f.is_nan() => Ok(None),
        Value::Text(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| ValuscopeError::Data(format!("cannot parse '{s}' as a date"))),
        Value::Int(i) => parse_date(&i.to_string())
            .map(Some)
            .ok_or_else(|| ValuscopeError::Data(format!("cannot interpret {i} as a date"))),
        other => Err(ValuscopeError::Data(format!(
            "cannot interpret {other} as a date"
        ))),
    }
}

/// A typed column. Missing cells are `None` (or `Value::Null` in `Mixed`).
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Calendar dates.
    Date(Vec<Option<NaiveDate>>),
    /// Floating point numbers; NaN is normalised to `None`.
    Float(Vec<Option<f64>>),
    /// Integers.
    Int(Vec<Option<i64>>),
    /// Booleans.
    Bool(Vec<Option<bool>>),
    /// Text.
    Text(Vec<Option<String>>),
    /// Heterogeneous cells that share no common kind.
    Mixed(Vec<Value>),
}

impl Column {
    /// Infer the narrowest column kind able to hold `values`.
    ///
    /// Integers and floats together widen to `Float`. Any other mix, or any
    /// list cell, falls back to `Mixed`. An all-null column becomes `Float`.
    #[must_use]
    pub fn from_values(values: Vec<Value>) -> Self {
        let (mut ints, mut floats, mut bools, mut texts, mut other) = (0, 0, 0, 0, 0);
        for v in &values {
            match v {
                Value::Null => {}
                Value::Int(_) => ints += 1,
                Value::Float(_) => floats += 1,
                Value::Bool(_) => bools += 1,
                Value::Text(_) => texts += 1,
                Value::List(_) => other += 1,
            }
        }
        let numeric = ints + floats;
        if other > 0 || [numeric, bools, texts].iter().filter(|&&n| n > 0).count() > 1 {
            return Self::Mixed(values);
        }
        if bools > 0 {
            return Self::Bool(
                values
                    .into_iter()
                    .map(|v| match v {
                        Value::Bool(b) => Some(b),
                        _ => None,
                    })
                    .collect(),
            );
        }
        if texts > 0 {
            return Self::Text(
                values
                    .into_iter()
                    .map(|v| match v {
                        Value::Text(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            );
        }
        if ints > 0 && floats == 0 {
            return Self::Int(
                values
                    .into_iter()
                    .map(|v| match v {
                        Value::Int(i) => Some(i),
                        _ => None,
                    })
                    .collect(),
            );
        }
        Self::Float(
            values
                .iter()
                .map(|v| v.as_f64().filter(|f| !f.is_nan()))
                .collect(),
        )
    }

    /// Parse every cell as a date.
    ///
    /// # Errors
    /// Returns `Data` when a non-null cell cannot be read as a date.
    pub fn dates_from_values(values: &[Value]) -> Result<Self, ValuscopeError> {
        values
            .iter()
            .map(date_from_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Date)
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Date(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Mixed(v) => v.len(),
        }
    }

    /// Whether the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the column kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Date(_) => "date",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::Mixed(_) => "mixed",
        }
    }

    /// The cell at `i` as a boundary value. Dates render as `YYYY-MM-DD`.
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    #[must_use]
    pub fn value(&self, i: usize) -> Value {
        match self {
            Self::Date(v) => v[i].map_or(Value::Null, |d| Value::Text(d.format("%Y-%m-%d").to_string())),
            Self::Float(v) => v[i].map_or(Value::Null, Value::Float),
            Self::Int(v) => v[i].map_or(Value::Null, Value::Int),
            Self::Bool(v) => v[i].map_or(Value::Null, Value::Bool),
            Self::Text(v) => v[i].clone().map_or(Value::Null, Value::Text),
            Self::Mixed(v) => v[i].clone(),
        }
    }

    /// Numeric view of the column.
    ///
    /// # Errors
    /// Returns `Data` for date, bool, and text columns, and for mixed columns
    /// holding a non-numeric, non-null cell.
    pub fn to_f64(&self) -> Result<Vec<Option<f64>>, ValuscopeError> {
        match self {
            Self::Float(v) => Ok(v.clone()),
            Self::Int(v) => Ok(v.iter().map(|c| c.map(|i| i as f64)).collect()),
            Self::Mixed(v) => v
                .iter()
                .map(|c| {
                    if c.is_null() {
                        Ok(None)
                    } else {
                        c.as_f64()
                            .map(Some)
                            .ok_or_else(|| ValuscopeError::Data(format!("non-numeric cell {c}")))
                    }
                })
                .collect(),
            other => Err(ValuscopeError::Data(format!(
                "expected a numeric column, found {}",
                other.kind()
            ))),
        }
    }

    /// Gather the cells at `indices`, in that order.
    #[must_use]
    pub fn take(&self, indices: &[usize]) -> Self {
        fn pick<T: Clone>(v: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| v[i].clone()).collect()
        }
        match self {
            Self::Date(v) => Self::Date(pick(v, indices)),
            Self::Float(v) => Self::Float(pick(v, indices)),
            Self::Int(v) => Self::Int(pick(v, indices)),
            Self::Bool(v) => Self::Bool(pick(v, indices)),
            Self::Text(v) => Self::Text(pick(v, indices)),
            Self::Mixed(v) => Self::Mixed(pick(v, indices)),
        }
    }
}

/// Column-oriented table: named columns of equal height, in a fixed order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            height: 0,
        }
    }

    /// Add or replace a column, returning the table.
    ///
    /// # Errors
    /// Returns `Data` if the column height differs from the table height.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self, ValuscopeError> {
        self.set_column(name, column)?;
        Ok(self)
    }

    /// Add or replace a column in place. A replaced column keeps its position.
    ///
    /// # Errors
    /// Returns `Data` if the column height differs from the table height.
    pub fn set_column(&mut self, name: impl Into<String>, column: Column) -> Result<(), ValuscopeError> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.height {
            return Err(ValuscopeError::Data(format!(
                "column '{name}' has {} rows, table has {}",
                column.len(),
                self.height
            )));
        }
        self.height = column.len();
        if let Some(pos) = self.names.iter().position(|n| *n == name) {
            self.columns[pos] = column;
        } else {
            self.names.push(name);
            self.columns.push(column);
        }
        Ok(())
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Whether a column with this name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Look up a column by name.
    ///
    /// # Errors
    /// Returns `Schema` if the column is absent.
    pub fn column(&self, name: &str) -> Result<&Column, ValuscopeError> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|pos| &self.columns[pos])
            .ok_or_else(|| ValuscopeError::missing_column(name))
    }

    /// Iterate over `(name, column)` pairs in order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// The dates of a date column with no missing cells.
    ///
    /// # Errors
    /// Returns `Schema` if the column is absent and `Data` if it is not a date
    /// column or contains a missing date.
    pub fn dates(&self, name: &str) -> Result<Vec<NaiveDate>, ValuscopeError> {
        match self.column(name)? {
            Column::Date(v) => v
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    d.ok_or_else(|| ValuscopeError::Data(format!("missing date in '{name}' at row {i}")))
                })
                .collect(),
            other => Err(ValuscopeError::Data(format!(
                "column '{name}' is {}, expected date",
                other.kind()
            ))),
        }
    }

    /// New table holding the rows at `indices`, in that order.
    #[must_use]
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            height: indices.len(),
        }
    }

    /// Stable sort of the rows by a date column.
    ///
    /// # Errors
    /// Same as [`Table::dates`].
    pub fn sorted_by_date(&self, name: &str) -> Result<Self, ValuscopeError> {
        let dates = self.dates(name)?;
        let mut order: Vec<usize> = (0..self.height).collect();
        order.sort_by_key(|&i| dates[i]);
        Ok(self.take(&order))
    }

    /// Extract `(date_column, value_column)` as a [`TimeSeries`] named after the value column.
    ///
    /// # Errors
    /// Returns `Schema` if either column is absent, and `Data` if the date
    /// column has missing cells or the value column is not numeric.
    pub fn series(&self, date_column: &str, value_column: &str) -> Result<TimeSeries, ValuscopeError> {
        let dates = self.dates(date_column)?;
        let values = self.column(value_column)?.to_f64()?;
        Ok(TimeSeries::new(value_column, dates.into_iter().zip(values)))
    }

    /// Build a table from row records.
    ///
    /// Columns appear in order of first appearance across the records; a key
    /// absent from a record reads as null. When `date_column` is given, that
    /// column is parsed into dates.
    ///
    /// # Errors
    /// Returns `Schema` if `date_column` is named but no record carries it,
    /// and `Data` if one of its cells cannot be parsed.
    pub fn from_records(records: &[Record], date_column: Option<&str>) -> Result<Self, ValuscopeError> {
        let mut names: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.to_string());
                }
            }
        }
        if let Some(dc) = date_column
            && !records.is_empty()
            && !names.iter().any(|n| n == dc)
        {
            return Err(ValuscopeError::missing_column(dc));
        }

        let mut table = Self::new();
        table.height = records.len();
        for name in names {
            let cells: Vec<Value> = records
                .iter()
                .map(|r| r.get(&name).cloned().unwrap_or(Value::Null))
                .collect();
            let column = if date_column == Some(name.as_str()) {
                Column::dates_from_values(&cells)?
            } else {
                Column::from_values(cells)
            };
            table.names.push(name);
            table.columns.push(column);
        }
        Ok(table)
    }

    /// Convert to row records, keeping column order.
    #[must_use]
    pub fn to_records(&self) -> Vec<Record> {
        (0..self.height)
            .map(|i| {
                self.columns()
                    .map(|(name, col)| (name.to_string(), col.value(i)))
                    .collect()
            })
            .collect()
    }
}

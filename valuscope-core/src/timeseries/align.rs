use chrono::NaiveDate;

use super::gaps::forward_fill;
use super::series::TimeSeries;
use crate::table::{Column, Table};
use crate::ValuscopeError;

/// A column attached to a primary calendar by a backward as-of match.
#[derive(Debug, Clone, PartialEq)]
pub struct AsOfColumn {
    name: String,
    values: Vec<Option<f64>>,
    source_dates: Vec<Option<NaiveDate>>,
}

impl AsOfColumn {
    /// Column name (the secondary series name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attached values, one per primary row.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Date of the secondary observation each value came from, or `None` when
    /// no observation exists at or before the row date.
    #[must_use]
    pub fn source_dates(&self) -> &[Option<NaiveDate>] {
        &self.source_dates
    }
}

/// Backward as-of match of `secondary` onto `primary_dates`.
///
/// Each primary date `d` receives the secondary observation with the greatest
/// date `<= d`, or nothing when every secondary date is later than `d`. The
/// matched observation's value is attached as-is, missing included. Primary
/// dates need not be sorted.
#[must_use]
pub fn align(primary_dates: &[NaiveDate], secondary: &TimeSeries) -> AsOfColumn {
    let dates = secondary.dates();
    let (values, source_dates) = primary_dates
        .iter()
        .map(|d| {
            // number of secondary dates <= d; the match is the last of them
            let n = dates.partition_point(|s| s <= d);
            n.checked_sub(1)
                .map_or((None, None), |i| (secondary.values()[i], Some(dates[i])))
        })
        .unzip();
    AsOfColumn {
        name: secondary.name().to_string(),
        values,
        source_dates,
    }
}

/// A primary table sorted by its date column, with as-of joined columns.
///
/// Joins chain: each [`AlignedTable::join_asof`] attaches one more secondary
/// series to the same calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    date_column: String,
    dates: Vec<NaiveDate>,
    base: Table,
    joined: Vec<AsOfColumn>,
}

impl AlignedTable {
    /// Use `base` as the primary calendar, keyed by `date_column`.
    ///
    /// # Errors
    /// Returns `Schema` if the date column is absent and `Data` if it is not a
    /// date column or has missing cells.
    pub fn new(base: Table, date_column: &str) -> Result<Self, ValuscopeError> {
        let base = base.sorted_by_date(date_column)?;
        let dates = base.dates(date_column)?;
        Ok(Self {
            date_column: date_column.to_string(),
            dates,
            base,
            joined: Vec::new(),
        })
    }

    /// Use a series as the primary calendar.
    #[must_use]
    pub fn from_series(primary: &TimeSeries, date_column: &str) -> Self {
        Self {
            date_column: date_column.to_string(),
            dates: primary.dates().to_vec(),
            base: primary.to_table(date_column),
            joined: Vec::new(),
        }
    }

    /// Attach `secondary` by backward as-of match.
    ///
    /// # Errors
    /// Returns `InvalidArg` if a column with the secondary series name already exists.
    pub fn join_asof(mut self, secondary: &TimeSeries) -> Result<Self, ValuscopeError> {
        let name = secondary.name();
        if self.base.has_column(name) || self.joined.iter().any(|c| c.name == name) {
            return Err(ValuscopeError::InvalidArg(format!(
                "column '{name}' already present in aligned table"
            )));
        }
        self.joined.push(align(&self.dates, secondary));
        Ok(self)
    }

    /// Forward fill a joined column. Source dates travel with the carried values.
    ///
    /// # Errors
    /// Returns `Schema` if no joined column has this name.
    pub fn forward_fill(mut self, column: &str) -> Result<Self, ValuscopeError> {
        let col = self.joined_mut(column)?;
        let mut carried: Option<NaiveDate> = None;
        for (v, src) in col.values.iter().zip(col.source_dates.iter_mut()) {
            if v.is_some() {
                carried = *src;
            } else {
                *src = carried;
            }
        }
        col.values = forward_fill(&col.values);
        Ok(self)
    }

    /// Rewrite the values of a joined column; source dates are left as matched.
    ///
    /// # Errors
    /// Returns `Schema` if no joined column has this name, and `Data` if `f`
    /// changes the column length.
    pub fn map_values<F>(mut self, column: &str, f: F) -> Result<Self, ValuscopeError>
    where
        F: FnOnce(&[Option<f64>]) -> Vec<Option<f64>>,
    {
        let col = self.joined_mut(column)?;
        let values = f(&col.values);
        if values.len() != col.values.len() {
            return Err(ValuscopeError::Data(format!(
                "rewrite of '{column}' changed its length"
            )));
        }
        col.values = values;
        Ok(self)
    }

    fn joined_mut(&mut self, column: &str) -> Result<&mut AsOfColumn, ValuscopeError> {
        self.joined
            .iter_mut()
            .find(|c| c.name == column)
            .ok_or_else(|| ValuscopeError::missing_column(column))
    }

    /// Primary calendar, ascending.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// A joined column by name.
    ///
    /// # Errors
    /// Returns `Schema` if no joined column has this name.
    pub fn joined(&self, column: &str) -> Result<&AsOfColumn, ValuscopeError> {
        self.joined
            .iter()
            .find(|c| c.name == column)
            .ok_or_else(|| ValuscopeError::missing_column(column))
    }

    /// Name of the date column.
    #[must_use]
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// The primary columns followed by the joined columns.
    ///
    /// # Errors
    /// Propagates height mismatches from [`Table::set_column`]; none occur for
    /// columns produced by this type.
    pub fn into_table(self) -> Result<Table, ValuscopeError> {
        let mut table = self.base;
        for col in self.joined {
            table.set_column(col.name, Column::Float(col.values))?;
        }
        Ok(table)
    }
}

use valuscope_core::{FilterCondition, FilterSet, Record, Table, ValuscopeError};

use crate::Valuscope;

impl Valuscope {
    /// Filter row records by `conditions` combined with `mode` (`"and"` / `"or"`).
    ///
    /// Kept records are returned unchanged and in input order. No conditions
    /// means no filtering, whatever `mode` says.
    ///
    /// # Errors
    /// `UnsupportedOperator` for an unknown operator, `Schema` for a missing
    /// column, `InvalidArg` for a malformed condition or mode, `Data` for a
    /// cell that cannot be read as a date under a date comparison.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "valuscope::filter_records",
            skip(self, records, conditions),
            fields(rows = records.len(), conditions = conditions.len()),
        )
    )]
    pub fn filter_records(
        &self,
        records: Vec<Record>,
        conditions: Vec<FilterCondition>,
        mode: &str,
    ) -> Result<Vec<Record>, ValuscopeError> {
        valuscope_core::filter_records(records, conditions, mode)
    }

    /// Filter a table by a typed filter set.
    ///
    /// # Errors
    /// As [`Valuscope::filter_records`], minus the mode check.
    pub fn filter_table(&self, table: &Table, set: &FilterSet) -> Result<Table, ValuscopeError> {
        valuscope_core::apply_filters(table, set)
    }
}

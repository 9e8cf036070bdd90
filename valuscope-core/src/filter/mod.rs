//! Record filtering.
//!
//! A [`FilterSet`] is evaluated column-wise: each condition resolves its
//! operator, its column, and its data type, coerces the column and operand,
//! and produces one boolean mask. Masks are combined with a single AND/OR mode.

mod coerce;
mod operator;

pub use coerce::DataType;
pub use operator::Operator;

use operator::Operand;

use crate::table::Table;
use crate::{CombineMode, FilterCondition, FilterSet, Record, ValuscopeError};

fn resolve_type(condition: &FilterCondition, op: Operator) -> Result<Option<DataType>, ValuscopeError> {
    // a malformed tag is rejected even when the operator fixes the type
    let explicit = condition
        .data_type
        .as_deref()
        .map(str::parse::<DataType>)
        .transpose()?;
    if op.is_textual() {
        return Ok(Some(DataType::Str));
    }
    Ok(explicit.or_else(|| DataType::infer(&condition.value)))
}

fn condition_mask(table: &Table, condition: &FilterCondition) -> Result<Vec<bool>, ValuscopeError> {
    let op: Operator = condition.operator.parse()?;
    let column = table.column(&condition.column)?;
    let ty = resolve_type(condition, op)?;
    op.check_operand(&condition.value)?;

    let Some(ty) = ty else {
        // null operand: nothing compares equal or ordered against it
        let predicate = op.predicate();
        let operand = if op.takes_list() { Operand::Many(Vec::new()) } else { Operand::One(None) };
        return Ok((0..table.height()).map(|_| predicate(None, &operand)).collect());
    };

    let cells = coerce::coerce_column(column, ty)?;
    let mut items = coerce::coerce_operand(&condition.value, ty)?;
    let operand = if op.takes_list() {
        Operand::Many(items)
    } else {
        Operand::One(items.pop().flatten())
    };
    let predicate = op.predicate();
    Ok(cells.iter().map(|c| predicate(c.as_ref(), &operand)).collect())
}

/// Evaluate `set` against `table`, one boolean per row.
///
/// # Errors
/// Returns `UnsupportedOperator` for an unknown operator tag, `Schema` for a
/// missing column, `InvalidArg` for a malformed condition, and `Data` when a
/// cell cannot be coerced to a date.
pub fn evaluate(table: &Table, set: &FilterSet) -> Result<Vec<bool>, ValuscopeError> {
    let identity = matches!(set.mode, CombineMode::And);
    let mut mask = vec![identity; table.height()];
    for condition in &set.conditions {
        let next = condition_mask(table, condition)?;
        for (acc, hit) in mask.iter_mut().zip(next) {
            *acc = match set.mode {
                CombineMode::And => *acc && hit,
                CombineMode::Or => *acc || hit,
            };
        }
    }
    Ok(mask)
}

/// Keep the rows of `table` that satisfy `set`, in their original order.
///
/// An empty set returns the table unchanged.
///
/// # Errors
/// See [`evaluate`].
pub fn apply_filters(table: &Table, set: &FilterSet) -> Result<Table, ValuscopeError> {
    if set.is_empty() {
        return Ok(table.clone());
    }
    let mask = evaluate(table, set)?;
    let keep: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter_map(|(i, hit)| hit.then_some(i))
        .collect();
    Ok(table.take(&keep))
}

/// Filter row records by `conditions`, combined with `mode` (`"and"` or `"or"`).
///
/// With no conditions the records come back unchanged and `mode` is not
/// inspected. Surviving records are returned as given, not rebuilt from the
/// table, so their field order and values are untouched.
///
/// # Errors
/// Returns `InvalidArg` for an unknown mode, plus everything [`evaluate`] returns.
pub fn filter_records(
    records: Vec<Record>,
    conditions: Vec<FilterCondition>,
    mode: &str,
) -> Result<Vec<Record>, ValuscopeError> {
    if conditions.is_empty() {
        return Ok(records);
    }
    let mode: CombineMode = mode.parse()?;
    if records.is_empty() {
        // no columns to resolve against; operator tags are still checked
        for condition in &conditions {
            condition.operator.parse::<Operator>()?;
        }
        return Ok(records);
    }
    let table = Table::from_records(&records, None)?;
    let mask = evaluate(&table, &FilterSet::new(conditions, mode))?;
    Ok(records
        .into_iter()
        .zip(mask)
        .filter_map(|(r, hit)| hit.then_some(r))
        .collect())
}

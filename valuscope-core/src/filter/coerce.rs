//! Type resolution and coercion for filter comparisons.
//!
//! Rules, applied to both the column cells and the operand:
//! - `str`: every non-null value compares by its text form (dates as `YYYY-MM-DD`).
//! - `int` / `float`: one numeric domain. Numeric cells as-is, text parsed,
//!   anything else null.
//! - `bool`: booleans, and the text `true` / `false` in any case.
//! - `date`: dates as-is, text parsed by [`parse_date`], integers read as
//!   `YYYYMMDD`. A cell that cannot be read as a date fails the evaluation.
//!
//! A malformed operand is always an `InvalidArg` error.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::table::{Column, date_from_value, parse_date};
use crate::{ValuscopeError, Value};

/// Data type under which a condition compares values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Text comparison.
    Str,
    /// Integer (shares the numeric domain with `Float`).
    Int,
    /// Floating point.
    Float,
    /// Boolean.
    Bool,
    /// Calendar date.
    Date,
}

impl DataType {
    /// Data type implied by an operand when no explicit tag is given.
    ///
    /// Scalars map to their own kind; a list uses its first element and an
    /// empty list means `Str`. `Null` implies nothing: every comparison against
    /// it treats the operand as missing.
    #[must_use]
    pub fn infer(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Self::Bool),
            Value::Int(_) => Some(Self::Int),
            Value::Float(_) => Some(Self::Float),
            Value::Text(_) => Some(Self::Str),
            Value::List(items) => items.first().map_or(Some(Self::Str), Self::infer),
        }
    }

    /// Wire tag of the data type.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Date => "date",
        }
    }
}

impl FromStr for DataType {
    type Err = ValuscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" | "string" => Ok(Self::Str),
            "int" | "integer" => Ok(Self::Int),
            "float" | "double" => Ok(Self::Float),
            "bool" | "boolean" => Ok(Self::Bool),
            "date" | "datetime" => Ok(Self::Date),
            other => Err(ValuscopeError::InvalidArg(format!("unknown data type '{other}'"))),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A coerced, comparable value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Scalar {
    Text(String),
    Num(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Scalar {
    /// Ordering within one domain; values of different domains are incomparable.
    pub(crate) fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Num(a), Self::Num(b)) => a.partial_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

fn text_of(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::Float(f) if f.is_nan() => None,
        Value::Text(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Lenient coercion of a cell value; `None` when the value has no reading in `ty`.
fn cell_from_value(v: &Value, ty: DataType) -> Result<Option<Scalar>, ValuscopeError> {
    Ok(match ty {
        DataType::Str => text_of(v).map(Scalar::Text),
        DataType::Int | DataType::Float => match v {
            Value::Text(s) => s.trim().parse::<f64>().ok().map(Scalar::Num),
            other => other.as_f64().filter(|f| !f.is_nan()).map(Scalar::Num),
        },
        DataType::Bool => match v {
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Text(s) => parse_bool(s.trim()).map(Scalar::Bool),
            _ => None,
        },
        DataType::Date => date_from_value(v)?.map(Scalar::Date),
    })
}

/// Coerce every cell of `column` into the domain of `ty`.
///
/// # Errors
/// Returns `Data` when `ty` is `Date` and a non-null cell cannot be read as a date.
pub(crate) fn coerce_column(column: &Column, ty: DataType) -> Result<Vec<Option<Scalar>>, ValuscopeError> {
    match (column, ty) {
        (Column::Date(v), DataType::Date) => Ok(v.iter().map(|d| d.map(Scalar::Date)).collect()),
        (Column::Date(v), DataType::Str) => Ok(v
            .iter()
            .map(|d| d.map(|d| Scalar::Text(d.format("%Y-%m-%d").to_string())))
            .collect()),
        (Column::Date(v), _) => Ok(vec![None; v.len()]),
        (Column::Float(v), DataType::Int | DataType::Float) => Ok(v.iter().map(|x| x.map(Scalar::Num)).collect()),
        (Column::Int(v), DataType::Int | DataType::Float) => {
            Ok(v.iter().map(|x| x.map(|i| Scalar::Num(i as f64))).collect())
        }
        (Column::Bool(v), DataType::Bool) => Ok(v.iter().map(|x| x.map(Scalar::Bool)).collect()),
        (Column::Text(v), DataType::Str) => Ok(v.iter().map(|x| x.clone().map(Scalar::Text)).collect()),
        (other, ty) => (0..other.len())
            .map(|i| cell_from_value(&other.value(i), ty))
            .collect(),
    }
}

/// Strict coercion of an operand scalar. `Null` stays missing.
fn operand_scalar(v: &Value, ty: DataType) -> Result<Option<Scalar>, ValuscopeError> {
    if v.is_null() {
        return Ok(None);
    }
    let invalid = || ValuscopeError::InvalidArg(format!("value {v} cannot be compared as {ty}"));
    let scalar = match ty {
        DataType::Str => text_of(v).map(Scalar::Text),
        DataType::Int | DataType::Float => match v {
            Value::Text(s) => s.trim().parse::<f64>().ok().map(Scalar::Num),
            other => other.as_f64().map(Scalar::Num),
        },
        DataType::Bool => match v {
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Text(s) => parse_bool(s.trim()).map(Scalar::Bool),
            _ => None,
        },
        DataType::Date => match v {
            Value::Text(s) => parse_date(s).map(Scalar::Date),
            Value::Int(i) => parse_date(&i.to_string()).map(Scalar::Date),
            _ => None,
        },
    };
    scalar.map(Some).ok_or_else(invalid)
}

/// Coerce an operand, element-wise for lists.
///
/// # Errors
/// Returns `InvalidArg` for an element with no reading in `ty`, or for a nested list.
pub(crate) fn coerce_operand(value: &Value, ty: DataType) -> Result<Vec<Option<Scalar>>, ValuscopeError> {
    match value {
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::List(_) => Err(ValuscopeError::InvalidArg("nested lists are not comparable".into())),
                scalar => operand_scalar(scalar, ty),
            })
            .collect(),
        scalar => Ok(vec![operand_scalar(scalar, ty)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_uses_first_list_element() {
        assert_eq!(DataType::infer(&Value::Int(1)), Some(DataType::Int));
        assert_eq!(
            DataType::infer(&Value::List(vec![Value::Float(1.5), Value::Text("x".into())])),
            Some(DataType::Float)
        );
        assert_eq!(DataType::infer(&Value::List(vec![])), Some(DataType::Str));
        assert_eq!(DataType::infer(&Value::Null), None);
    }

    #[test]
    fn text_cells_coerce_to_dates_or_fail() {
        let col = Column::Text(vec![Some("2024-01-02".into()), None]);
        let out = coerce_column(&col, DataType::Date).unwrap();
        assert_eq!(out[0], Some(Scalar::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())));
        assert_eq!(out[1], None);

        let bad = Column::Text(vec![Some("soon".into())]);
        assert!(matches!(coerce_column(&bad, DataType::Date), Err(ValuscopeError::Data(_))));
    }

    #[test]
    fn numeric_coercion_is_lenient_for_cells_and_strict_for_operands() {
        let col = Column::Text(vec![Some(" 12 ".into()), Some("abc".into())]);
        assert_eq!(
            coerce_column(&col, DataType::Int).unwrap(),
            vec![Some(Scalar::Num(12.0)), None]
        );
        assert!(matches!(
            coerce_operand(&Value::Text("abc".into()), DataType::Float),
            Err(ValuscopeError::InvalidArg(_))
        ));
    }

    #[test]
    fn str_domain_renders_numbers() {
        let col = Column::Int(vec![Some(10)]);
        assert_eq!(
            coerce_column(&col, DataType::Str).unwrap(),
            vec![Some(Scalar::Text("10".into()))]
        );
    }

    #[test]
    fn unknown_data_type_tag_is_invalid() {
        assert!(matches!("decimal".parse::<DataType>(), Err(ValuscopeError::InvalidArg(_))));
    }
}

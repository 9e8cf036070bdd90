use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::coerce::Scalar;
use crate::{ValuscopeError, Value};

/// Filter operators. The set is closed; each variant maps to one predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `eq`
    Eq,
    /// `ne`
    Ne,
    /// `gt`
    Gt,
    /// `lt`
    Lt,
    /// `ge`
    Ge,
    /// `le`
    Le,
    /// `in`: cell equals one of the listed values.
    In,
    /// `not_in`
    NotIn,
    /// `contains`: substring match on the text form of the cell.
    Contains,
    /// `not_contains`
    NotContains,
}

/// Comparison operand after coercion: a single scalar or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    One(Option<Scalar>),
    Many(Vec<Option<Scalar>>),
}

pub(crate) type Predicate = fn(Option<&Scalar>, &Operand) -> bool;

impl Operator {
    /// Every operator, in tag order.
    pub const ALL: [Self; 10] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Lt,
        Self::Ge,
        Self::Le,
        Self::In,
        Self::NotIn,
        Self::Contains,
        Self::NotContains,
    ];

    /// The wire tag of the operator.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Ge => "ge",
            Self::Le => "le",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
        }
    }

    /// Whether the operand must be a list.
    #[must_use]
    pub const fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Whether the operator compares text forms regardless of data type.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::Contains | Self::NotContains)
    }

    /// Check that the raw operand has the shape this operator needs.
    pub(crate) fn check_operand(self, value: &Value) -> Result<(), ValuscopeError> {
        let is_list = matches!(value, Value::List(_));
        if self.takes_list() && !is_list {
            return Err(ValuscopeError::InvalidArg(format!(
                "operator '{}' requires a list value, got {value}",
                self.tag()
            )));
        }
        if !self.takes_list() && is_list {
            return Err(ValuscopeError::InvalidArg(format!(
                "operator '{}' requires a scalar value, got a list",
                self.tag()
            )));
        }
        Ok(())
    }

    pub(crate) fn predicate(self) -> Predicate {
        match self {
            Self::Eq => eq,
            Self::Ne => ne,
            Self::Gt => gt,
            Self::Lt => lt,
            Self::Ge => ge,
            Self::Le => le,
            Self::In => is_in,
            Self::NotIn => not_in,
            Self::Contains => contains,
            Self::NotContains => not_contains,
        }
    }
}

impl FromStr for Operator {
    type Err = ValuscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.tag() == s)
            .ok_or_else(|| ValuscopeError::unsupported_operator(s))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn compare(cell: Option<&Scalar>, operand: &Operand) -> Option<Ordering> {
    match (cell, operand) {
        (Some(c), Operand::One(Some(o))) => c.compare(o),
        _ => None,
    }
}

fn eq(cell: Option<&Scalar>, operand: &Operand) -> bool {
    compare(cell, operand) == Some(Ordering::Equal)
}

fn ne(cell: Option<&Scalar>, operand: &Operand) -> bool {
    !eq(cell, operand)
}

fn gt(cell: Option<&Scalar>, operand: &Operand) -> bool {
    compare(cell, operand) == Some(Ordering::Greater)
}

fn lt(cell: Option<&Scalar>, operand: &Operand) -> bool {
    compare(cell, operand) == Some(Ordering::Less)
}

fn ge(cell: Option<&Scalar>, operand: &Operand) -> bool {
    matches!(compare(cell, operand), Some(Ordering::Greater | Ordering::Equal))
}

fn le(cell: Option<&Scalar>, operand: &Operand) -> bool {
    matches!(compare(cell, operand), Some(Ordering::Less | Ordering::Equal))
}

fn is_in(cell: Option<&Scalar>, operand: &Operand) -> bool {
    let (Some(c), Operand::Many(items)) = (cell, operand) else {
        return false;
    };
    items
        .iter()
        .flatten()
        .any(|item| c.compare(item) == Some(Ordering::Equal))
}

fn not_in(cell: Option<&Scalar>, operand: &Operand) -> bool {
    !is_in(cell, operand)
}

fn contains(cell: Option<&Scalar>, operand: &Operand) -> bool {
    match (cell, operand) {
        (Some(Scalar::Text(c)), Operand::One(Some(Scalar::Text(needle)))) => c.contains(needle.as_str()),
        _ => false,
    }
}

fn not_contains(cell: Option<&Scalar>, operand: &Operand) -> bool {
    !contains(cell, operand)
}

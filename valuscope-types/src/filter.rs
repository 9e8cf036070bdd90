//! Filter payloads as they arrive from callers.
//!
//! Operator and data-type tags are kept as raw strings here; they are only
//! resolved when a filter is evaluated, so an unknown operator is reported by
//! the evaluation that tried to use it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ValuscopeError, Value};

fn default_operator() -> String {
    "eq".to_string()
}

/// One predicate over a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Column the predicate reads.
    pub column: String,
    /// Operator tag (`eq`, `ne`, `gt`, `lt`, `ge`, `le`, `in`, `not_in`,
    /// `contains`, `not_contains`). Defaults to `eq` when omitted.
    #[serde(default = "default_operator")]
    pub operator: String,
    /// Comparison operand; a list for membership operators.
    pub value: Value,
    /// Optional explicit data type (`str`, `int`, `float`, `bool`, `date`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl FilterCondition {
    /// Build a condition without an explicit data type.
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
            data_type: None,
        }
    }

    /// Attach an explicit data type tag.
    #[must_use]
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }
}

/// How per-condition masks are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    /// Every condition must hold.
    #[default]
    And,
    /// At least one condition must hold.
    Or,
}

impl FromStr for CombineMode {
    type Err = ValuscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            other => Err(ValuscopeError::InvalidArg(format!(
                "combination mode must be 'and' or 'or', got '{other}'"
            ))),
        }
    }
}

/// Ordered conditions combined under a single mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSet {
    /// Conditions in evaluation order.
    pub conditions: Vec<FilterCondition>,
    /// Combination mode applied uniformly.
    #[serde(default)]
    pub mode: CombineMode,
}

impl FilterSet {
    /// Build a set from conditions and a mode.
    #[must_use]
    pub const fn new(conditions: Vec<FilterCondition>, mode: CombineMode) -> Self {
        Self { conditions, mode }
    }

    /// True when no conditions are present; such a set is the identity filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_defaults_to_eq() {
        let c: FilterCondition = serde_json::from_str(r#"{"column":"A","value":"x"}"#).unwrap();
        assert_eq!(c.operator, "eq");
        assert_eq!(c.data_type, None);
    }

    #[test]
    fn combine_mode_parses_lowercase_only() {
        assert_eq!("and".parse::<CombineMode>().unwrap(), CombineMode::And);
        assert_eq!("or".parse::<CombineMode>().unwrap(), CombineMode::Or);
        assert!(matches!(
            "xor".parse::<CombineMode>(),
            Err(ValuscopeError::InvalidArg(_))
        ));
    }
}

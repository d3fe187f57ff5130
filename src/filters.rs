//! Saved View Filters
//!
//! A filter is an ordered list of conditions joined by a single logic mode. Conditions compare a
//! row field against a literal using the coercions in [`crate::values`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::values::{Row, as_instant, as_number, as_text, is_empty};

/// Filter validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A condition uses an operator this evaluator does not know.
    #[error("condition {index} uses an unknown operator")]
    UnknownOperator {
        /// Position of the condition in the filter.
        index: usize,
    },

    /// A condition does not name a field.
    #[error("condition {index} has no field")]
    EmptyField {
        /// Position of the condition in the filter.
        index: usize,
    },
}

/// Comparison applied by a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Text equality.
    Equals,

    /// Text inequality.
    #[serde(alias = "notEquals")]
    NotEquals,

    /// Case-insensitive substring match.
    Contains,

    /// Negated case-insensitive substring match.
    #[serde(alias = "notContains")]
    NotContains,

    /// Numeric `>`.
    #[serde(alias = "greaterThan", alias = "gt")]
    GreaterThan,

    /// Numeric `<`.
    #[serde(alias = "lessThan", alias = "lt")]
    LessThan,

    /// Inclusive numeric range.
    Between,

    /// Missing, `null` or empty string.
    #[serde(alias = "isEmpty")]
    IsEmpty,

    /// Anything but missing, `null` or empty string.
    #[serde(alias = "isNotEmpty")]
    IsNotEmpty,

    /// Instant strictly before the value.
    Before,

    /// Instant strictly after the value.
    After,

    /// Operator name not recognised when the filter was read.
    #[serde(other)]
    Unknown,
}

impl FilterOperator {
    /// Whether the operator compares against a condition value.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::IsEmpty | Self::IsNotEmpty | Self::Unknown)
    }
}

/// How conditions combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterLogic {
    /// Every condition must hold.
    #[default]
    And,

    /// At least one condition must hold.
    Or,
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Row field to read.
    pub field: String,

    /// Comparison to apply.
    pub operator: FilterOperator,

    /// Comparison value; the lower bound for [`FilterOperator::Between`].
    #[serde(default)]
    pub value: Value,

    /// Upper bound for [`FilterOperator::Between`].
    #[serde(default, alias = "valueTo", skip_serializing_if = "Option::is_none")]
    pub value_to: Option<Value>,
}

impl FilterCondition {
    /// Create a condition without a range end.
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            value_to: None,
        }
    }

    /// Create an inclusive range condition.
    pub fn between(field: impl Into<String>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Between,
            value: low.into(),
            value_to: Some(high.into()),
        }
    }

    /// Whether the condition takes part in evaluation.
    ///
    /// Conditions still waiting for a value (as left behind by a half-filled filter row) and
    /// conditions with an unknown operator are inactive and always pass.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self.operator {
            FilterOperator::Unknown => false,
            FilterOperator::Between => {
                !is_empty(Some(&self.value)) && !is_empty(self.value_to.as_ref())
            }
            operator if operator.takes_value() => !is_empty(Some(&self.value)),
            _ => true,
        }
    }

    /// Evaluate the condition against a row.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        if !self.is_active() {
            return true;
        }

        let field = row.get(&self.field);
        let value = Some(&self.value);

        match self.operator {
            FilterOperator::Equals => as_text(field) == as_text(value),
            FilterOperator::NotEquals => as_text(field) != as_text(value),
            FilterOperator::Contains => contains_folded(&as_text(field), &as_text(value)),
            FilterOperator::NotContains => !contains_folded(&as_text(field), &as_text(value)),
            FilterOperator::GreaterThan => as_number(field) > as_number(value),
            FilterOperator::LessThan => as_number(field) < as_number(value),
            FilterOperator::Between => {
                let actual = as_number(field);

                actual >= as_number(value) && actual <= as_number(self.value_to.as_ref())
            }
            FilterOperator::IsEmpty => is_empty(field),
            FilterOperator::IsNotEmpty => !is_empty(field),
            FilterOperator::Before => as_instant(field) < as_instant(value),
            FilterOperator::After => as_instant(field) > as_instant(value),
            FilterOperator::Unknown => true,
        }
    }
}

/// An ordered set of conditions and the logic joining them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewFilter {
    /// Conditions in display order.
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,

    /// Logic joining the conditions.
    #[serde(default)]
    pub logic: FilterLogic,
}

impl ViewFilter {
    /// Create a filter.
    #[must_use]
    pub fn new(conditions: Vec<FilterCondition>, logic: FilterLogic) -> Self {
        Self { conditions, logic }
    }

    /// Evaluate the filter against a row.
    ///
    /// Inactive conditions are left out before the logic is applied, so a half-filled row
    /// neither narrows an AND filter nor turns an OR filter into match-all. A filter with no
    /// active conditions matches everything.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        let mut active = self
            .conditions
            .iter()
            .filter(|condition| condition.is_active())
            .peekable();

        if active.peek().is_none() {
            return true;
        }

        match self.logic {
            FilterLogic::And => active.all(|condition| condition.matches(row)),
            FilterLogic::Or => active.any(|condition| condition.matches(row)),
        }
    }

    /// Keep the rows that match, preserving order.
    #[must_use]
    pub fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        if self.conditions.is_empty() {
            return rows;
        }

        rows.into_iter().filter(|row| self.matches(row)).collect()
    }

    /// Reject filters that could not have been built through the view editor.
    ///
    /// # Errors
    ///
    /// Returns the first condition with an unknown operator or an empty field name.
    pub fn validate(&self) -> Result<(), FilterError> {
        for (index, condition) in self.conditions.iter().enumerate() {
            if condition.field.trim().is_empty() {
                return Err(FilterError::EmptyField { index });
            }

            if condition.operator == FilterOperator::Unknown {
                return Err(FilterError::UnknownOperator { index });
            }
        }

        Ok(())
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

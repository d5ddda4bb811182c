//! Field filters
//!
//! `fieldsEqual` entries arrive as loosely typed maps (`name`, `value`,
//! `operator`). They are decoded into [`FieldFilter`] before any predicate is
//! built, so an unknown operator never reaches the index.

use itemsearch_common::errors::{AppError, Result};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// How the values of one field filter combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterOperator {
    /// Every value must be present
    And,
    /// At least one value must be present
    Or,
}

impl FromStr for FilterOperator {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "AND" => Ok(FilterOperator::And),
            "OR" => Ok(FilterOperator::Or),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOperator::And => f.write_str("AND"),
            FilterOperator::Or => f.write_str("OR"),
        }
    }
}

/// One decoded field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub name: String,
    pub values: Vec<String>,
    pub operator: FilterOperator,
}

/// A `fieldsEqual` entry as supplied by the caller
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RawFieldFilter {
    /// Index field name to filter on
    #[validate(length(min = 1, message = "field name must not be empty"))]
    pub name: String,

    /// Field values to filter on
    #[validate(length(min = 1, message = "at least one filter value is required"))]
    #[serde(deserialize_with = "stringify_values")]
    pub value: Vec<String>,

    /// `AND` or `OR`
    pub operator: String,
}

impl RawFieldFilter {
    pub fn new(name: &str, values: &[&str], operator: &str) -> Self {
        Self {
            name: name.to_string(),
            value: values.iter().map(|v| v.to_string()).collect(),
            operator: operator.to_string(),
        }
    }
}

impl TryFrom<&RawFieldFilter> for FieldFilter {
    type Error = AppError;

    fn try_from(raw: &RawFieldFilter) -> Result<Self> {
        let operator = raw
            .operator
            .parse::<FilterOperator>()
            .map_err(|_| AppError::InvalidFilterOperator {
                field: raw.name.clone(),
                operator: raw.operator.clone(),
            })?;

        raw.validate().map_err(|e| AppError::Validation {
            message: e.to_string(),
            field: Some(raw.name.clone()),
        })?;

        Ok(FieldFilter {
            name: raw.name.clone(),
            values: raw.value.clone(),
            operator,
        })
    }
}

/// Decode every entry, failing on the first invalid one
pub fn decode_filters(raw: &[RawFieldFilter]) -> Result<Vec<FieldFilter>> {
    raw.iter().map(FieldFilter::try_from).collect()
}

/// Accept scalar JSON values and keep their string form
fn stringify_values<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            other => Err(D::Error::custom(format!("unsupported filter value: {}", other))),
        })
        .collect()
}

//! Comparison operators supported by the filter builder.

use crate::error::DbError;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// A comparison operator for a single filter condition.
///
/// The set is closed on purpose: filters are a flat `AND` of
/// `<column> <op> $n` comparisons and nothing else.
///
/// # Example
/// ```ignore
/// use pgfilter::FilterOp;
///
/// assert_eq!(FilterOp::Gt.as_sql(), ">");
/// assert_eq!("iLIKE".parse::<FilterOp>()?, FilterOp::ILike);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Equal: column = value
    Eq,
    /// Greater than: column > value
    Gt,
    /// Less than: column < value
    Lt,
    /// Greater than or equal: column >= value
    Gte,
    /// Less than or equal: column <= value
    Lte,
    /// Case-insensitive substring match: column iLIKE '%value%'
    ILike,
}

impl FilterOp {
    /// The operator token as it appears in SQL.
    pub const fn as_sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gt => ">",
            FilterOp::Lt => "<",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
            FilterOp::ILike => "iLIKE",
        }
    }

    /// Transform a caller value into the value actually bound.
    ///
    /// `ILike` turns the value into a substring pattern (`%value%`); the
    /// comparison operators bind the value unchanged. `NULL` is never wrapped.
    pub fn bind_value(self, value: &Value) -> Value {
        match (self, value) {
            (FilterOp::ILike, Value::Null) => Value::Null,
            (FilterOp::ILike, v) => Value::Text(format!("%{v}%")),
            (_, v) => v.clone(),
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for FilterOp {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(FilterOp::Eq),
            ">" => Ok(FilterOp::Gt),
            "<" => Ok(FilterOp::Lt),
            ">=" => Ok(FilterOp::Gte),
            "<=" => Ok(FilterOp::Lte),
            _ if s.eq_ignore_ascii_case("ilike") => Ok(FilterOp::ILike),
            _ => Err(DbError::validation(format!("Unsupported operator: '{s}'"))),
        }
    }
}

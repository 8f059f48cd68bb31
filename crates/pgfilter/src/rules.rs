//! Per-operation filter configuration and field-set validation.
//!
//! A data-access operation describes which criteria it understands with a
//! [`FilterRules`] value: the allowed field set, the operator bound to each
//! field, the column each field maps to and any `(min, max)` range pairs.

use crate::error::{DbError, DbResult};
use crate::fields::FieldMap;
use crate::op::FilterOp;
use crate::value::Value;

/// Logical field name -> physical column name.
///
/// Fields without an entry map to a column of the same name. Entries added at
/// runtime take precedence over the static ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAliases {
    fixed: &'static [(&'static str, &'static str)],
    added: Vec<(String, String)>,
}

impl ColumnAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aliases usable in a `const`.
    ///
    /// ```ignore
    /// const JOB_ALIASES: ColumnAliases =
    ///     ColumnAliases::from_static(&[("companyHandle", "company_handle")]);
    /// ```
    pub const fn from_static(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            fixed: pairs,
            added: Vec::new(),
        }
    }

    /// Builder-style alias registration.
    pub fn with(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.insert(field, column);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, column: impl Into<String>) {
        let field = field.into();
        let column = column.into();
        match self.added.iter_mut().find(|(f, _)| *f == field) {
            Some((_, slot)) => *slot = column,
            None => self.added.push((field, column)),
        }
    }

    /// Column for `field`, falling back to the field name itself.
    pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        if let Some((_, column)) = self.added.iter().find(|(f, _)| f == field) {
            return column;
        }
        self.fixed
            .iter()
            .find(|(f, _)| *f == field)
            .map_or(field, |&(_, column)| column)
    }
}

impl<F: Into<String>, C: Into<String>> FromIterator<(F, C)> for ColumnAliases {
    fn from_iter<I: IntoIterator<Item = (F, C)>>(iter: I) -> Self {
        let mut aliases = Self::new();
        for (f, c) in iter {
            aliases.insert(f, c);
        }
        aliases
    }
}

/// Logical field name -> comparison operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorMap {
    pairs: Vec<(String, FilterOp)>,
}

impl OperatorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, op: FilterOp) -> Self {
        self.insert(field, op);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, op: FilterOp) {
        let field = field.into();
        match self.pairs.iter_mut().find(|(f, _)| *f == field) {
            Some((_, slot)) => *slot = op,
            None => self.pairs.push((field, op)),
        }
    }

    pub fn get(&self, field: &str) -> Option<FilterOp> {
        self.pairs.iter().find(|(f, _)| f == field).map(|(_, op)| *op)
    }
}

impl<F: Into<String>> FromIterator<(F, FilterOp)> for OperatorMap {
    fn from_iter<I: IntoIterator<Item = (F, FilterOp)>>(iter: I) -> Self {
        let mut ops = Self::new();
        for (f, op) in iter {
            ops.insert(f, op);
        }
        ops
    }
}

/// A declared lower/upper bound pair over the same quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBound {
    pub min: String,
    pub max: String,
}

impl RangeBound {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }
}

/// Everything the WHERE builder needs to know about one operation's filters.
///
/// # Example
/// ```ignore
/// use pgfilter::{FilterOp, FilterRules};
///
/// let rules = FilterRules::new()
///     .field("name", FilterOp::ILike)
///     .field_as("minEmployees", "num_employees", FilterOp::Gt)
///     .field_as("maxEmployees", "num_employees", FilterOp::Lt)
///     .range("minEmployees", "maxEmployees");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterRules {
    allowed: Vec<String>,
    operators: OperatorMap,
    aliases: ColumnAliases,
    ranges: Vec<RangeBound>,
}

impl FilterRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble rules from loose parts.
    ///
    /// The allowed set is given separately from the operator map, so a field
    /// can be allowed without an operator; building a clause for such a field
    /// fails with [`DbError::MissingOperator`].
    pub fn from_parts<S: Into<String>>(
        allowed: impl IntoIterator<Item = S>,
        operators: OperatorMap,
        aliases: ColumnAliases,
    ) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            operators,
            aliases,
            ranges: Vec::new(),
        }
    }

    /// Allow a field that filters the column of the same name.
    pub fn field(mut self, name: impl Into<String>, op: FilterOp) -> Self {
        let name = name.into();
        self.operators.insert(name.clone(), op);
        self.allow_name(name);
        self
    }

    /// Allow a field that filters a differently named column.
    pub fn field_as(
        mut self,
        name: impl Into<String>,
        column: impl Into<String>,
        op: FilterOp,
    ) -> Self {
        let name = name.into();
        self.aliases.insert(name.clone(), column);
        self.operators.insert(name.clone(), op);
        self.allow_name(name);
        self
    }

    /// Declare that `min` must not exceed `max` when both are present.
    pub fn range(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.ranges.push(RangeBound::new(min, max));
        self
    }

    fn allow_name(&mut self, name: String) {
        if !self.allowed.contains(&name) {
            self.allowed.push(name);
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn operator(&self, field: &str) -> Option<FilterOp> {
        self.operators.get(field)
    }

    pub fn column<'a>(&'a self, field: &'a str) -> &'a str {
        self.aliases.resolve(field)
    }

    pub fn ranges(&self) -> &[RangeBound] {
        &self.ranges
    }
}

/// Check that every criteria key is allowed and that at least one is.
///
/// Unknown keys are reported first, in criteria order. Empty criteria pass.
/// An allowed key only counts as recognized when it carries a value: `NULL`
/// or blank text does not select anything.
pub fn validate_fields<S: AsRef<str>>(criteria: &FieldMap, allowed: &[S]) -> DbResult<()> {
    if criteria.is_empty() {
        return Ok(());
    }

    let is_allowed = |key: &str| allowed.iter().any(|a| a.as_ref() == key);

    let unknown = unknown_fields(criteria, allowed);
    if !unknown.is_empty() {
        return Err(DbError::UnknownField { fields: unknown });
    }

    if !criteria.iter().any(|(k, v)| is_allowed(k) && !is_blank(v)) {
        return Err(DbError::NoRecognizedField {
            allowed: allowed.iter().map(|a| a.as_ref().to_string()).collect(),
        });
    }

    Ok(())
}

/// Keys of `fields` that are not in `allowed`, in insertion order.
pub fn unknown_fields<S: AsRef<str>>(fields: &FieldMap, allowed: &[S]) -> Vec<String> {
    fields
        .keys()
        .filter(|k| !allowed.iter().any(|a| a.as_ref() == *k))
        .map(str::to_string)
        .collect()
}

pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Reject criteria where a declared minimum exceeds its maximum.
///
/// Only numeric bounds are compared; a non-numeric bound is left for the
/// database to reject when it is bound.
pub fn check_ranges(criteria: &FieldMap, ranges: &[RangeBound]) -> DbResult<()> {
    for range in ranges {
        let (Some(min), Some(max)) = (criteria.get(&range.min), criteria.get(&range.max)) else {
            continue;
        };
        if exceeds(min, max) {
            return Err(DbError::RangeConflict {
                min_field: range.min.clone(),
                max_field: range.max.clone(),
            });
        }
    }
    Ok(())
}

/// `min > max`, compared exactly where both fit a decimal.
fn exceeds(min: &Value, max: &Value) -> bool {
    if let (Some(min), Some(max)) = (min.as_decimal(), max.as_decimal()) {
        return min > max;
    }
    matches!((min.as_f64(), max.as_f64()), (Some(min), Some(max)) if min > max)
}

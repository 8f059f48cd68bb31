//! Parameter-safe `SET` and `WHERE` fragment builders.
//!
//! Both builders return a [`Clause`]: a SQL fragment that references its
//! values positionally (`$1, $2, ...`) plus the values in the same order.
//! Values are never written into the fragment; only validated column names
//! are.
//!
//! # Example
//!
//! ```ignore
//! use pgfilter::{FieldMap, FilterOp, FilterRules, build_where_clause};
//!
//! let rules = FilterRules::new()
//!     .field("title", FilterOp::ILike)
//!     .field_as("minSalary", "salary", FilterOp::Gt);
//! let criteria = FieldMap::new().with("title", "eng").with("minSalary", 50_000);
//!
//! let clause = build_where_clause(&criteria, &rules)?;
//! assert_eq!(clause.fragment(), "WHERE title iLIKE $1 AND salary > $2");
//! ```

use crate::error::{DbError, DbResult};
use crate::fields::FieldMap;
use crate::ident::Ident;
use crate::rules::{ColumnAliases, FilterRules, check_ranges, is_blank, validate_fields};
use crate::value::Value;
use tokio_postgres::types::ToSql;


/// A SQL fragment with its positional parameters.
///
/// The highest `$n` marker in `fragment` equals `params.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clause {
    fragment: String,
    params: Vec<Value>,
}

impl Clause {
    /// The "no filtering" clause: empty fragment, no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }

    /// Marker index for a parameter appended after this clause's own.
    ///
    /// `UPDATE ... SET <fragment> WHERE id = $<next_marker>`.
    pub fn next_marker(&self) -> usize {
        self.params.len() + 1
    }

    /// Get parameter references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    /// `head`, the fragment and `tail` joined by single spaces; an empty
    /// fragment is skipped.
    pub fn splice(&self, head: &str, tail: &str) -> String {
        [head, self.fragment.as_str(), tail]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.fragment, self.params)
    }
}

/// Build a `SET` fragment from the fields to update.
///
/// Each field becomes `"<column>"=$<i>` in insertion order, joined by `, `.
/// Values are passed through unchanged; the database validates them.
///
/// Fails with [`DbError::EmptyUpdate`] if `fields` is empty.
pub fn build_set_clause(fields: &FieldMap, aliases: &ColumnAliases) -> DbResult<Clause> {
    if fields.is_empty() {
        return Err(DbError::EmptyUpdate);
    }

    let mut fragment = String::new();
    let mut params = Vec::with_capacity(fields.len());
    for (field, value) in fields.iter() {
        if !params.is_empty() {
            fragment.push_str(", ");
        }
        Ident::quoted(aliases.resolve(field))?.write_sql(&mut fragment);
        params.push(value.clone());
        fragment.push_str(&format!("=${}", params.len()));
    }

    Ok(Clause { fragment, params })
}

/// Build a `WHERE` fragment from untrusted filter criteria.
///
/// - Empty criteria yield [`Clause::empty`]; callers must not add `WHERE`.
/// - Otherwise the field set and the declared ranges are checked before any
///   SQL is produced, then each criterion becomes `<column> <op> $<i>`,
///   joined by ` AND ` and prefixed with `WHERE `.
/// - Criteria set to `NULL` or blank text select nothing and are skipped;
///   markers stay dense.
pub fn build_where_clause(criteria: &FieldMap, rules: &FilterRules) -> DbResult<Clause> {
    if criteria.is_empty() {
        return Ok(Clause::empty());
    }

    where_clause(criteria, rules).inspect_err(|err| {
        tracing::debug!(
            target: "pgfilter.filter",
            kind = err.kind(),
            fields = criteria.len(),
            "rejected filter criteria"
        );
    })
}

fn where_clause(criteria: &FieldMap, rules: &FilterRules) -> DbResult<Clause> {
    validate_fields(criteria, rules.allowed())?;
    check_ranges(criteria, rules.ranges())?;

    let mut fragment = String::from("WHERE ");
    let mut params = Vec::with_capacity(criteria.len());
    for (field, value) in criteria.iter().filter(|(_, v)| !is_blank(v)) {
        let op = rules
            .operator(field)
            .ok_or_else(|| DbError::MissingOperator(field.to_string()))?;
        let column = Ident::parse(rules.column(field))?;

        if !params.is_empty() {
            fragment.push_str(" AND ");
        }
        column.write_sql(&mut fragment);
        params.push(op.bind_value(value));
        fragment.push_str(&format!(" {} ${}", op, params.len()));
    }

    Ok(Clause { fragment, params })
}

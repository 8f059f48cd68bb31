//! Typed filter fields.
//!
//! Instead of passing loose operator and alias maps around, an operation
//! declares its recognized filters as an enum implementing [`FilterField`].
//! Each variant is bound to its request name, its column and its operator, so
//! the allowed set, the operators and the aliases cannot drift apart.
//!
//! # Example
//!
//! ```ignore
//! use pgfilter::{Filter, FilterField, FilterOp};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum ProductField { Name, MinPrice }
//!
//! impl FilterField for ProductField {
//!     const ALL: &'static [Self] = &[Self::Name, Self::MinPrice];
//!
//!     fn name(self) -> &'static str {
//!         match self { Self::Name => "name", Self::MinPrice => "minPrice" }
//!     }
//!     fn column(self) -> &'static str {
//!         match self { Self::Name => "name", Self::MinPrice => "price" }
//!     }
//!     fn op(self) -> FilterOp {
//!         match self { Self::Name => FilterOp::ILike, Self::MinPrice => FilterOp::Gte }
//!     }
//! }
//!
//! let clause = Filter::new().with(ProductField::MinPrice, 10).build()?;
//! assert_eq!(clause.fragment(), "WHERE price >= $1");
//! ```

use crate::clause::{Clause, build_where_clause};
use crate::error::DbResult;
use crate::fields::FieldMap;
use crate::op::FilterOp;
use crate::rules::{FilterRules, is_blank, validate_fields};
use crate::value::Value;
use std::fmt;

/// A recognized filter field of one data-access operation.
pub trait FilterField: Copy + Eq + fmt::Debug + 'static {
    /// Every variant, in the order they are reported to callers.
    const ALL: &'static [Self];

    /// `(min, max)` pairs where `min` must not exceed `max`.
    const RANGES: &'static [(Self, Self)] = &[];

    /// The name used in requests (e.g. `minEmployees`).
    fn name(self) -> &'static str;

    /// The column compared against (e.g. `num_employees`).
    fn column(self) -> &'static str;

    fn op(self) -> FilterOp;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl FilterRules {
    /// Build the runtime rules for a [`FilterField`] enum.
    pub fn from_fields<F: FilterField>() -> Self {
        let rules = F::ALL
            .iter()
            .fold(FilterRules::new(), |rules, f| {
                rules.field_as(f.name(), f.column(), f.op())
            });
        F::RANGES
            .iter()
            .fold(rules, |rules, (min, max)| rules.range(min.name(), max.name()))
    }
}

/// Typed filter criteria for one [`FilterField`] enum.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<F> {
    entries: Vec<(F, Value)>,
}

impl<F: FilterField> Default for Filter<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F: FilterField> Filter<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a criterion, replacing an earlier value for the same field.
    pub fn with(mut self, field: F, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    pub fn get(&self, field: F) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse untrusted loose criteria into a typed filter.
    ///
    /// Fails with [`DbError::UnknownField`](crate::DbError::UnknownField) or
    /// [`DbError::NoRecognizedField`](crate::DbError::NoRecognizedField).
    pub fn parse(criteria: &FieldMap) -> DbResult<Self> {
        let names: Vec<&'static str> = F::ALL.iter().map(|f| f.name()).collect();
        validate_fields(criteria, &names)?;

        let mut filter = Self::new();
        for (key, value) in criteria.iter() {
            // validate_fields guarantees every key names a variant.
            if let Some(field) = F::from_name(key) {
                filter = filter.with(field, value.clone());
            }
        }
        Ok(filter)
    }

    /// Loose criteria keyed by request name, in insertion order.
    pub fn to_criteria(&self) -> FieldMap {
        self.entries
            .iter()
            .map(|(f, v)| (f.name(), v.clone()))
            .collect()
    }

    /// Build the `WHERE` clause.
    ///
    /// Criteria set to `NULL` or blank text are left out. Only range conflicts
    /// can fail here; the field set is known to be valid.
    pub fn build(&self) -> DbResult<Clause> {
        let criteria: FieldMap = self
            .entries
            .iter()
            .filter(|(_, v)| !is_blank(v))
            .map(|(f, v)| (f.name(), v.clone()))
            .collect();
        build_where_clause(&criteria, &FilterRules::from_fields::<F>())
    }
}

//! # pgfilter
//!
//! Parameter-safe dynamic `UPDATE` and `WHERE` fragments for Postgres.
//!
//! ## Features
//!
//! - **Values never reach SQL text**: every value is bound as `$n`
//! - **Allow-listed filters**: unknown or empty criteria are rejected before any SQL is built
//! - **Typed filter fields**: declare a data-access operation's filters as an enum
//! - **Loose values**: query strings and JSON bodies bind to the column's real type
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//!
//! ## Partial updates
//!
//! ```ignore
//! use pgfilter::{ColumnAliases, FieldMap, build_set_clause, query};
//!
//! let data = FieldMap::new().with("title", "Staff Engineer").with("companyHandle", "acme");
//! let aliases = ColumnAliases::new().with("companyHandle", "company_handle");
//!
//! let set = build_set_clause(&data, &aliases)?;
//! let sql = format!("UPDATE jobs SET {} WHERE id = ${}", set.fragment(), set.next_marker());
//! query(sql).bind_clause(set).bind(job_id).execute(&client).await?;
//! ```
//!
//! ## Filtering
//!
//! ```ignore
//! use pgfilter::{Companies, FieldMap};
//!
//! let criteria = FieldMap::from_query_pairs([("name", "net"), ("minEmployees", "100")]);
//! let companies = Companies::find_all(&client, &criteria).await?;
//! ```

pub mod clause;
pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod filter;
pub mod ident;
pub mod models;
pub mod op;
#[cfg(feature = "pool")]
pub mod pool;
pub mod query;
pub mod row;
pub mod rules;
pub mod value;

pub use clause::{Clause, build_set_clause, build_where_clause};
pub use client::GenericClient;
pub use config::DbConfig;
pub use error::{DbError, DbResult};
pub use fields::FieldMap;
pub use filter::{Filter, FilterField};
pub use ident::Ident;
pub use models::{Companies, Company, CompanyField, Job, JobField, Jobs, NewJob};
pub use op::FilterOp;
#[cfg(feature = "pool")]
pub use pool::create_pool;
pub use query::{Query, query};
pub use row::{FromRow, RowExt};
pub use rules::{
    ColumnAliases, FilterRules, OperatorMap, RangeBound, check_ranges, unknown_fields,
    validate_fields,
};
pub use value::Value;

// Re-export tokio-postgres for convenience
pub use tokio_postgres;
#[cfg(feature = "pool")]
pub use deadpool_postgres;

//! Query runner for hand-written SQL templates

use crate::clause::Clause;
use crate::client::GenericClient;
use crate::error::DbResult;
use crate::row::FromRow;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// SQL longer than this (in bytes) is truncated in log events.
const MAX_LOGGED_SQL: usize = 200;

/// A SQL template with `$1, $2, ...` markers and the values bound to them.
///
/// Parameters are bound in the order they are added, so a [`Clause`] appended
/// with [`Query::bind_clause`] must come before any value whose marker is
/// [`Clause::next_marker`].
///
/// # Example
///
/// ```ignore
/// use pgfilter::query;
///
/// let job: Job = query("SELECT * FROM jobs WHERE id = $1")
///     .tag("jobs.get")
///     .bind(job_id)
///     .fetch_one_as(&conn)
///     .await?;
/// ```
pub struct Query {
    sql: String,
    params: Vec<Box<dyn ToSql + Sync + Send>>,
    tag: Option<String>,
}

/// Create a new query with the given SQL
pub fn query(sql: impl Into<String>) -> Query {
    Query {
        sql: sql.into(),
        params: Vec::new(),
        tag: None,
    }
}

impl Query {
    /// Associate a tag for log events.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Bind a parameter to the query
    pub fn bind<T: ToSql + Sync + Send + 'static>(mut self, value: T) -> Self {
        self.params.push(Box::new(value));
        self
    }

    /// Bind every parameter of a clause, in order.
    pub fn bind_clause(mut self, clause: Clause) -> Self {
        let (_, params) = clause.into_parts();
        for value in params {
            self.params.push(Box::new(value));
        }
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_ref() as _).collect()
    }

    fn log(&self) {
        let tag = self.tag.as_deref().unwrap_or("-");
        tracing::debug!(
            target: "pgfilter.sql",
            tag,
            param_count = self.params.len(),
            sql = %truncate_sql(&self.sql, MAX_LOGGED_SQL),
        );
    }

    /// Execute the query and return all rows
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> DbResult<Vec<Row>> {
        self.log();
        conn.query(&self.sql, &self.params_ref()).await
    }

    /// Execute the query and return all rows mapped to type T
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> DbResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the query and return the first row (`NotFound` if none)
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> DbResult<Row> {
        self.log();
        conn.query_one(&self.sql, &self.params_ref()).await
    }

    /// Execute the query and return the first row mapped to type T
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> DbResult<T> {
        let row = self.fetch_one(conn).await?;
        T::from_row(&row)
    }

    /// Execute the query and return at most one row
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> DbResult<Option<Row>> {
        self.log();
        conn.query_opt(&self.sql, &self.params_ref()).await
    }

    /// Execute the query and return at most one row mapped to type T
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> DbResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the query and return the number of affected rows
    pub async fn execute(&self, conn: &impl GenericClient) -> DbResult<u64> {
        self.log();
        conn.execute(&self.sql, &self.params_ref()).await
    }
}

/// Truncate to at most `max` bytes on a char boundary.
fn truncate_sql(sql: &str, max: usize) -> std::borrow::Cow<'_, str> {
    if sql.len() <= max {
        return sql.into();
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &sql[..end]).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::build_set_clause;
    use crate::fields::FieldMap;
    use crate::rules::ColumnAliases;

    #[test]
    fn bind_clause_then_trailing_id() {
        let fields = FieldMap::new().with("title", "New").with("salary", 30000);
        let clause = build_set_clause(&fields, &ColumnAliases::new()).unwrap();
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${}",
            clause.fragment(),
            clause.next_marker()
        );
        let q = query(sql).bind_clause(clause).bind(7_i32);

        assert_eq!(
            q.sql(),
            r#"UPDATE jobs SET "title"=$1, "salary"=$2 WHERE id = $3"#
        );
        assert_eq!(q.param_count(), 3);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_sql("SELECT 1", 200), "SELECT 1");
        assert_eq!(truncate_sql("ééé", 3), "é...");
    }
}

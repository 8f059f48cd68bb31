use crate::client::GenericClient;
use crate::error::DbResult;
use crate::fields::FieldMap;
use crate::filter::{Filter, FilterField};
use crate::op::FilterOp;
use crate::query::query;
use crate::row::{FromRow, RowExt};
use serde::Serialize;
use tokio_postgres::Row;

const COMPANY_COLUMNS: &str = "handle, name, num_employees, description, logo_url";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub num_employees: Option<i32>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            num_employees: row.try_get_column("num_employees")?,
            description: row.try_get_column("description")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Filters accepted by [`Companies::find_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyField {
    /// Case-insensitive substring of the name.
    Name,
    /// Strictly more employees than this.
    MinEmployees,
    /// Strictly fewer employees than this.
    MaxEmployees,
}

impl FilterField for CompanyField {
    const ALL: &'static [Self] = &[Self::Name, Self::MinEmployees, Self::MaxEmployees];
    const RANGES: &'static [(Self, Self)] = &[(Self::MinEmployees, Self::MaxEmployees)];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::MinEmployees => "minEmployees",
            Self::MaxEmployees => "maxEmployees",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::MinEmployees | Self::MaxEmployees => "num_employees",
        }
    }

    fn op(self) -> FilterOp {
        match self {
            Self::Name => FilterOp::ILike,
            Self::MinEmployees => FilterOp::Gt,
            Self::MaxEmployees => FilterOp::Lt,
        }
    }
}

pub struct Companies;

impl Companies {
    /// Companies matching the criteria, ordered by name.
    ///
    /// Empty criteria return every company.
    pub async fn find_all(conn: &impl GenericClient, criteria: &FieldMap) -> DbResult<Vec<Company>> {
        let clause = Filter::<CompanyField>::parse(criteria)?.build()?;
        let sql = clause.splice(
            &format!("SELECT {COMPANY_COLUMNS} FROM companies"),
            "ORDER BY name",
        );
        query(sql)
            .tag("companies.find_all")
            .bind_clause(clause)
            .fetch_all_as(conn)
            .await
    }

    pub async fn exists(conn: &impl GenericClient, handle: &str) -> DbResult<bool> {
        let row = query("SELECT handle FROM companies WHERE handle = $1")
            .tag("companies.exists")
            .bind(handle.to_string())
            .fetch_opt(conn)
            .await?;
        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::value::Value;

    #[test]
    fn employee_bounds_share_a_column() {
        let criteria = FieldMap::from_query_pairs([("minEmployees", "10"), ("maxEmployees", "500")]);
        let clause = Filter::<CompanyField>::parse(&criteria)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            clause.fragment(),
            "WHERE num_employees > $1 AND num_employees < $2"
        );
        assert_eq!(clause.params(), [Value::from("10"), Value::from("500")]);
    }

    #[test]
    fn inverted_employee_bounds_are_rejected() {
        let criteria = FieldMap::from_query_pairs([("minEmployees", "900"), ("maxEmployees", "50")]);
        let res = Filter::<CompanyField>::parse(&criteria).unwrap().build();
        assert!(matches!(
            res,
            Err(DbError::RangeConflict { ref min_field, ref max_field })
                if min_field == "minEmployees" && max_field == "maxEmployees"
        ));
    }

    #[test]
    fn handle_is_not_filterable() {
        let criteria = FieldMap::new().with("handle", "acme");
        let err = Filter::<CompanyField>::parse(&criteria).unwrap_err();
        assert_eq!(err.to_string(), "Unknown filter field(s): handle");
    }
}

use super::companies::Companies;
use crate::clause::build_set_clause;
use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::fields::FieldMap;
use crate::filter::{Filter, FilterField};
use crate::op::FilterOp;
use crate::query::query;
use crate::row::{FromRow, RowExt};
use crate::rules::{ColumnAliases, is_blank, unknown_fields, validate_fields};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

/// Request names accepted by [`Jobs::find_all`].
const FILTER_NAMES: [&str; 3] = ["title", "minSalary", "hasEquity"];

/// Request names accepted by [`Jobs::update`].
const UPDATE_NAMES: [&str; 4] = ["title", "salary", "equity", "companyHandle"];

const UPDATE_ALIASES: ColumnAliases =
    ColumnAliases::from_static(&[("companyHandle", "company_handle")]);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// A job posting to insert.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Filters accepted by [`Jobs::find_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobField {
    /// Case-insensitive substring of the title.
    Title,
    /// Strictly higher salary than this.
    MinSalary,
    /// Strictly more equity than this. Requests only ever set it to zero,
    /// through `hasEquity=true`.
    HasEquity,
}

impl FilterField for JobField {
    const ALL: &'static [Self] = &[Self::Title, Self::MinSalary, Self::HasEquity];

    fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::MinSalary => "minSalary",
            Self::HasEquity => "hasEquity",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::MinSalary => "salary",
            Self::HasEquity => "equity",
        }
    }

    fn op(self) -> FilterOp {
        match self {
            Self::Title => FilterOp::ILike,
            Self::MinSalary | Self::HasEquity => FilterOp::Gt,
        }
    }
}

pub struct Jobs;

impl Jobs {
    /// Turn request criteria into a typed job filter.
    ///
    /// `hasEquity` must be a boolean (`"true"`/`"false"` from a query string
    /// count); `true` keeps jobs with equity above zero, while `false` or a
    /// blank value does not filter at all.
    pub fn filter(criteria: &FieldMap) -> DbResult<Filter<JobField>> {
        validate_fields(criteria, &FILTER_NAMES)?;

        let mut filter = Filter::new();
        for (key, value) in criteria.iter() {
            match JobField::from_name(key) {
                Some(JobField::HasEquity) => match value.as_bool() {
                    Some(true) => filter = filter.with(JobField::HasEquity, 0),
                    Some(false) => {}
                    None if is_blank(value) => {}
                    None => {
                        return Err(DbError::validation("hasEquity must be true or false"));
                    }
                },
                Some(field) => filter = filter.with(field, value.clone()),
                None => {}
            }
        }
        Ok(filter)
    }

    /// Insert a job for an existing company.
    pub async fn create(conn: &impl GenericClient, job: &NewJob) -> DbResult<Job> {
        if !Companies::exists(conn, &job.company_handle).await? {
            return Err(DbError::validation(format!(
                "No company exists with handle: {}",
                job.company_handle
            )));
        }

        query(format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {JOB_COLUMNS}"
        ))
        .tag("jobs.create")
        .bind(job.title.clone())
        .bind(job.salary)
        .bind(job.equity)
        .bind(job.company_handle.clone())
        .fetch_one_as(conn)
        .await
    }

    /// Jobs matching the criteria, ordered by title.
    pub async fn find_all(conn: &impl GenericClient, criteria: &FieldMap) -> DbResult<Vec<Job>> {
        let clause = Self::filter(criteria)?.build()?;
        let sql = clause.splice(&format!("SELECT {JOB_COLUMNS} FROM jobs"), "ORDER BY title");
        query(sql)
            .tag("jobs.find_all")
            .bind_clause(clause)
            .fetch_all_as(conn)
            .await
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> DbResult<Job> {
        query(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .tag("jobs.get")
            .bind(id)
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| job_not_found(id))
    }

    /// Every job posted by a company; empty if it has none.
    pub async fn find_by_company(conn: &impl GenericClient, handle: &str) -> DbResult<Vec<Job>> {
        query(format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE company_handle = $1 ORDER BY title"
        ))
        .tag("jobs.find_by_company")
        .bind(handle.to_string())
        .fetch_all_as(conn)
        .await
    }

    /// Partially update a job. `NULL` values clear the column.
    pub async fn update(conn: &impl GenericClient, id: i32, data: &FieldMap) -> DbResult<Job> {
        let unknown = unknown_fields(data, &UPDATE_NAMES);
        if !unknown.is_empty() {
            return Err(DbError::UnknownField { fields: unknown });
        }

        let set = build_set_clause(data, &UPDATE_ALIASES)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {JOB_COLUMNS}",
            set.fragment(),
            set.next_marker()
        );

        query(sql)
            .tag("jobs.update")
            .bind_clause(set)
            .bind(id)
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| job_not_found(id))
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> DbResult<()> {
        query("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .tag("jobs.remove")
            .bind(id)
            .fetch_opt(conn)
            .await?
            .map(|_| ())
            .ok_or_else(|| job_not_found(id))
    }
}

fn job_not_found(id: i32) -> DbError {
    DbError::not_found(format!("No job with id of {id} found"))
}

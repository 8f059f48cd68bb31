//! Data-access tests against a live database.
//!
//! Set `DATABASE_URL` (or put it in `.env`) to run them; otherwise every test
//! returns early. Each test works on session-local temp tables.

use pgfilter::{Companies, DbError, FieldMap, Jobs, NewJob, Value, query};
use rust_decimal::Decimal;

async fn try_connect() -> Option<tokio_postgres::Client> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

async fn seed(client: &tokio_postgres::Client) {
    client
        .batch_execute(
            "CREATE TEMP TABLE companies (
                handle TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                num_employees INTEGER CHECK (num_employees >= 0),
                description TEXT,
                logo_url TEXT
            );
            CREATE TEMP TABLE jobs (
                id SERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                salary INTEGER CHECK (salary >= 0),
                equity NUMERIC CHECK (equity <= 1.0),
                company_handle TEXT NOT NULL REFERENCES companies ON DELETE CASCADE
            );
            INSERT INTO companies (handle, name, num_employees) VALUES
                ('c1', 'C1', 1),
                ('c2', 'C2', 2),
                ('c3', 'C3', 3);
            INSERT INTO jobs (title, salary, equity, company_handle) VALUES
                ('J1', 1, 0.1, 'c1'),
                ('J2', 2, 0.2, 'c1'),
                ('J3', 3, NULL, 'c1'),
                ('Other', 4, 0, 'c2');",
        )
        .await
        .unwrap();
}

async fn job_id(client: &tokio_postgres::Client, title: &str) -> i32 {
    let row = query("SELECT id FROM jobs WHERE title = $1")
        .bind(title.to_string())
        .fetch_one(client)
        .await
        .unwrap();
    row.get(0)
}

fn titles(jobs: &[pgfilter::Job]) -> Vec<&str> {
    jobs.iter().map(|j| j.title.as_str()).collect()
}

#[tokio::test]
async fn create_requires_existing_company() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    seed(&client).await;

    let job = NewJob {
        title: "New".into(),
        salary: Some(100),
        equity: Some(Decimal::new(5, 2)),
        company_handle: "c1".into(),
    };
    let created = Jobs::create(&client, &job).await.unwrap();
    assert_eq!(created.title, "New");
    assert_eq!(created.equity, Some(Decimal::new(5, 2)));
    assert_eq!(Jobs::get(&client, created.id).await.unwrap(), created);

    let orphan = NewJob {
        company_handle: "nope".into(),
        ..job
    };
    let err = Jobs::create(&client, &orphan).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation error: No company exists with handle: nope"
    );
}

#[tokio::test]
async fn find_all_filters_and_orders_by_title() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    seed(&client).await;

    let all = Jobs::find_all(&client, &FieldMap::new()).await.unwrap();
    assert_eq!(titles(&all), ["J1", "J2", "J3", "Other"]);

    let by_title = FieldMap::from_query_pairs([("title", "j")]);
    let jobs = Jobs::find_all(&client, &by_title).await.unwrap();
    assert_eq!(titles(&jobs), ["J1", "J2", "J3"]);

    let paid = FieldMap::from_query_pairs([("minSalary", "2"), ("hasEquity", "true")]);
    let jobs = Jobs::find_all(&client, &paid).await.unwrap();
    assert!(jobs.is_empty(), "Other has zero equity, J3 has none");

    let equity = FieldMap::new().with("hasEquity", true);
    let jobs = Jobs::find_all(&client, &equity).await.unwrap();
    assert_eq!(titles(&jobs), ["J1", "J2"]);

    let no_equity_filter = FieldMap::new().with("hasEquity", false);
    let jobs = Jobs::find_all(&client, &no_equity_filter).await.unwrap();
    assert_eq!(jobs.len(), 4);
}

#[tokio::test]
async fn find_all_rejects_bad_criteria_without_querying() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    seed(&client).await;

    let err = Jobs::find_all(&client, &FieldMap::new().with("salary", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::UnknownField { .. }));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn update_binds_id_after_set_values() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    seed(&client).await;
    let id = job_id(&client, "J1").await;

    let data = FieldMap::new()
        .with("title", "Renamed")
        .with("equity", Value::Null)
        .with("companyHandle", "c3");
    let job = Jobs::update(&client, id, &data).await.unwrap();
    assert_eq!(job.id, id);
    assert_eq!(job.title, "Renamed");
    assert_eq!(job.salary, Some(1));
    assert_eq!(job.equity, None);
    assert_eq!(job.company_handle, "c3");

    // Query-string text binds to INTEGER and NUMERIC columns.
    let data = FieldMap::from_query_pairs([("salary", "5000"), ("equity", "0.25")]);
    let job = Jobs::update(&client, id, &data).await.unwrap();
    assert_eq!(job.salary, Some(5000));
    assert_eq!(job.equity, Some(Decimal::new(25, 2)));
}

#[tokio::test]
async fn update_errors() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    seed(&client).await;
    let id = job_id(&client, "J1").await;

    let err = Jobs::update(&client, id, &FieldMap::new()).await.unwrap_err();
    assert!(matches!(err, DbError::EmptyUpdate));

    let err = Jobs::update(&client, id, &FieldMap::new().with("id", 9))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::UnknownField { .. }));

    let err = Jobs::update(&client, 0, &FieldMap::new().with("title", "x"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = Jobs::update(&client, id, &FieldMap::new().with("salary", -1))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::CheckViolation(_)));

    let err = Jobs::update(&client, id, &FieldMap::new().with("title", Value::Null))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotNullViolation(_)));
    assert!(err.is_client_error());

    let err = Jobs::update(&client, id, &FieldMap::new().with("companyHandle", "nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation(_)));
}

#[tokio::test]
async fn get_find_by_company_and_remove() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    seed(&client).await;

    let jobs = Jobs::find_by_company(&client, "c1").await.unwrap();
    assert_eq!(titles(&jobs), ["J1", "J2", "J3"]);
    assert!(Jobs::find_by_company(&client, "c3").await.unwrap().is_empty());

    let id = job_id(&client, "Other").await;
    Jobs::remove(&client, id).await.unwrap();

    let err = Jobs::get(&client, id).await.unwrap_err();
    assert_eq!(err.to_string(), format!("Not found: No job with id of {id} found"));
    assert!(Jobs::remove(&client, id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn companies_filter_by_employee_range() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    seed(&client).await;

    let criteria = FieldMap::from_query_pairs([("minEmployees", "1"), ("maxEmployees", "3")]);
    let companies = Companies::find_all(&client, &criteria).await.unwrap();
    let handles: Vec<&str> = companies.iter().map(|c| c.handle.as_str()).collect();
    assert_eq!(handles, ["c2"]);

    let criteria = FieldMap::new().with("minEmployees", 3).with("maxEmployees", 1);
    let err = Companies::find_all(&client, &criteria).await.unwrap_err();
    assert_eq!(err.to_string(), "minEmployees cannot be greater than maxEmployees");

    assert!(Companies::exists(&client, "c1").await.unwrap());
    assert!(!Companies::exists(&client, "zz").await.unwrap());
}

#[tokio::test]
async fn works_inside_a_transaction() {
    let Some(mut client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    seed(&client).await;
    let id = job_id(&client, "J2").await;

    let tx = client.transaction().await.unwrap();
    Jobs::update(&tx, id, &FieldMap::new().with("title", "Draft"))
        .await
        .unwrap();
    assert_eq!(Jobs::get(&tx, id).await.unwrap().title, "Draft");
    tx.rollback().await.unwrap();

    assert_eq!(Jobs::get(&client, id).await.unwrap().title, "J2");
}

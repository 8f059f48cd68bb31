//! Connection pool utilities

use crate::config::DbConfig;
use crate::error::{DbError, DbResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a [`DbConfig`].
///
/// Uses `NoTls`; the statement timeout, when set, is applied as a connection
/// option so it holds for every pooled session.
///
/// # Example
///
/// ```ignore
/// let pool = pgfilter::create_pool(&DbConfig::from_env()?)?;
/// let client = pool.get().await?;
/// let jobs = Jobs::find_all(&client, &FieldMap::new()).await?;
/// ```
pub fn create_pool(config: &DbConfig) -> DbResult<Pool> {
    let mut pg_config: tokio_postgres::Config = config
        .database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| DbError::Connection(e.to_string()))?;

    if let Some(ms) = config.statement_timeout_ms {
        pg_config.options(&format!("-c statement_timeout={ms}"));
    }

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, manager_config);
    Pool::builder(mgr)
        .max_size(config.max_pool_size)
        .build()
        .map_err(|e| DbError::Pool(e.to_string()))
}

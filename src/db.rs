//! Shared SQLite pool setup. Each application owns its own database file;
//! nothing is shared between the two stores at runtime.

use crate::error::FrontdeskError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating the file if absent) a pool for `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool, FrontdeskError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// `%substring%` with LIKE metacharacters escaped, for use with
/// `LIKE ? ESCAPE '\'`.
pub fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Execute a bundled DDL blob statement-by-statement (sqlx::query rejects
/// multi-statement strings on SQLite).
pub async fn init_schema(pool: &SqlitePool, ddl: &str) -> Result<(), FrontdeskError> {
    for stmt in ddl.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

pub mod models;
pub mod preferences;
pub mod repo;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed preferences document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Opens the pool and makes sure the schema exists.
///
/// An in-memory database lives only as long as its connection, so those
/// URLs get a single connection that is never recycled.
pub async fn connect(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = if db_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = options.connect(db_url).await?;
    repo::create_tables(&pool).await?;

    Ok(pool)
}

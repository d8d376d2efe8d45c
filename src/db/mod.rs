//! Generic data-access engine.
//!
//! [`schema`] holds the allow-listed identifiers, [`value`] the bindable
//! scalars and row decoding, [`statement`] the pure SQL builders and
//! [`engine`] the execution against a `PgPool`. The pool itself is created
//! here and handed to callers explicitly.

pub mod engine;
pub mod schema;
pub mod statement;
pub mod value;

pub use engine::BaseQuery;
pub use schema::{Column, ColumnKind, Condition, Table, TableColumnSpec, ALLOWED_COLUMNS};
pub use statement::Statement;
pub use value::{Record, Value};

use crate::config::Config;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Opens the pool and checks it with a round trip to the server.
pub async fn connect(config: &Config) -> Result<PgPool, AppError> {
    log::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect to database: {}", e)))?;

    let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
        .fetch_one(&pool)
        .await?;
    log::info!("Database connection established (server time {})", now);
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

//! Execution of generated statements.
//!
//! Reads run directly on the pool. Mutations check out a dedicated
//! connection with `pool.begin()`, execute, then commit; any execution
//! failure issues an explicit rollback before the error is returned. The
//! connection goes back to the pool when the transaction is dropped, on
//! every path.

use crate::db::schema::{Condition, TableColumnSpec};
use crate::db::statement::{self, Statement};
use crate::db::value::{row_to_record, Record, Value};
use crate::error::AppError;
use log::{debug, error, warn};
use sqlx::{PgPool, Postgres};

/// A validated `(table, columns)` pair bound to a pool for one operation.
pub struct BaseQuery<'a> {
    pool: &'a PgPool,
    spec: TableColumnSpec,
}

impl<'a> BaseQuery<'a> {
    pub fn new(pool: &'a PgPool, spec: TableColumnSpec) -> Self {
        Self { pool, spec }
    }

    /// Validates raw identifiers, e.g. `BaseQuery::parse(&pool, "users", "id, nome")`.
    pub fn parse(pool: &'a PgPool, table: &str, columns: &str) -> Result<Self, AppError> {
        Ok(Self::new(pool, TableColumnSpec::parse(table, columns)?))
    }

    pub fn spec(&self) -> &TableColumnSpec {
        &self.spec
    }

    pub async fn select_all(&self) -> Result<Vec<Record>, AppError> {
        self.fetch(statement::select_all(&self.spec), "fetch all rows")
            .await
    }

    pub async fn select_columns(&self) -> Result<Vec<Record>, AppError> {
        self.fetch(statement::select_columns(&self.spec), "fetch columns")
            .await
    }

    /// Returns zero or one row; an empty condition returns zero without a query.
    pub async fn select_by_value(&self, condition: &Condition) -> Result<Vec<Record>, AppError> {
        match statement::select_by_value(&self.spec, condition) {
            Some(statement) => self.fetch(statement, "fetch row by value").await,
            None => Ok(Vec::new()),
        }
    }

    /// `values` align positionally with the spec's columns.
    pub async fn insert_values(&self, values: Vec<Value>) -> Result<u64, AppError> {
        let statement = statement::insert(&self.spec, values)?;
        self.execute_in_transaction(statement, "insert values").await
    }

    pub async fn update_values(
        &self,
        values: Vec<Value>,
        condition: &Condition,
    ) -> Result<u64, AppError> {
        let statement = statement::update(&self.spec, values, condition)?;
        self.execute_in_transaction(statement, "update values").await
    }

    pub async fn delete_values(&self, condition: &Condition) -> Result<u64, AppError> {
        let statement = statement::delete(&self.spec, condition)?;
        self.execute_in_transaction(statement, "delete values").await
    }

    async fn fetch(&self, statement: Statement, action: &str) -> Result<Vec<Record>, AppError> {
        debug!("{} ({} params)", statement.sql, statement.params.len());
        let query = statement
            .params
            .iter()
            .fold(sqlx::query::<Postgres>(&statement.sql), |query, value| value.bind_to(query));

        let rows = query.fetch_all(self.pool).await.map_err(|e| {
            error!("Failed to {} on {}: {}", action, self.spec.table(), e);
            AppError::DatabaseError(format!("Failed to {}: {}", action, e))
        })?;

        rows.iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::DatabaseError(format!("Failed to decode rows: {}", e)))
    }

    async fn execute_in_transaction(
        &self,
        statement: Statement,
        action: &str,
    ) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to begin transaction on {}: {}", self.spec.table(), e);
            AppError::DatabaseError(format!("Failed to {}: {}", action, e))
        })?;

        debug!("{} ({} params)", statement.sql, statement.params.len());
        let query = statement
            .params
            .iter()
            .fold(sqlx::query::<Postgres>(&statement.sql), |query, value| value.bind_to(query));

        match query.execute(&mut *tx).await {
            Ok(result) => {
                tx.commit().await.map_err(|e| {
                    error!("Failed to commit {} on {}: {}", action, self.spec.table(), e);
                    AppError::DatabaseError(format!("Failed to {}: {}", action, e))
                })?;
                Ok(result.rows_affected())
            }
            Err(e) => {
                error!("Failed to {} on {}: {}", action, self.spec.table(), e);
                if let Err(rollback_error) = tx.rollback().await {
                    warn!("Rollback on {} failed: {}", self.spec.table(), rollback_error);
                }
                Err(AppError::DatabaseError(format!("Failed to {}: {}", action, e)))
            }
        }
    }
}

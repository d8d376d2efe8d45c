//! SQL text generation.
//!
//! Identifiers come from [`TableColumnSpec`] and [`Condition`] keys, both of
//! which are allow-listed enums. Values are never interpolated: each one
//! gets a `$n` placeholder and is carried in [`Statement::params`] in
//! placeholder order.

use crate::db::schema::{Condition, TableColumnSpec};
use crate::db::value::Value;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// `k1 = $n, k2 = $n+1 ...` joined by `separator`, starting at `$first`.
fn assignments<'a, I>(columns: I, first: usize, separator: &str) -> String
where
    I: Iterator<Item = &'a str>,
{
    columns
        .enumerate()
        .map(|(index, column)| format!("{} = ${}", column, first + index))
        .collect::<Vec<_>>()
        .join(separator)
}

fn where_clause(condition: &Condition, first: usize) -> String {
    assignments(condition.iter().map(|(column, _)| column.as_str()), first, " AND ")
}

fn condition_values(condition: &Condition) -> impl Iterator<Item = Value> + '_ {
    condition.iter().map(|(_, value)| value.clone())
}

fn require_condition(condition: &Condition, action: &str) -> Result<(), AppError> {
    if condition.is_empty() {
        return Err(AppError::ValidationError(format!(
            "Refusing to {} without a condition",
            action
        )));
    }
    Ok(())
}

fn require_aligned(spec: &TableColumnSpec, values: &[Value]) -> Result<(), AppError> {
    if values.len() != spec.columns().len() {
        return Err(AppError::ValidationError(format!(
            "Expected {} values for columns ({}), got {}",
            spec.columns().len(),
            spec.column_list(),
            values.len()
        )));
    }
    Ok(())
}

/// `SELECT * FROM table`. The column list is validated but not projected.
pub fn select_all(spec: &TableColumnSpec) -> Statement {
    Statement {
        sql: format!("SELECT * FROM {}", spec.table()),
        params: Vec::new(),
    }
}

pub fn select_columns(spec: &TableColumnSpec) -> Statement {
    Statement {
        sql: format!("SELECT {} FROM {}", spec.column_list(), spec.table()),
        params: Vec::new(),
    }
}

/// At most one row matching `condition`. An empty condition matches nothing,
/// so no statement is built for it.
pub fn select_by_value(spec: &TableColumnSpec, condition: &Condition) -> Option<Statement> {
    if condition.is_empty() {
        return None;
    }
    Some(Statement {
        sql: format!(
            "SELECT {} FROM {} WHERE {} LIMIT 1",
            spec.column_list(),
            spec.table(),
            where_clause(condition, 1)
        ),
        params: condition_values(condition).collect(),
    })
}

pub fn insert(spec: &TableColumnSpec, values: Vec<Value>) -> Result<Statement, AppError> {
    require_aligned(spec, &values)?;
    let placeholders = (1..=values.len())
        .map(|index| format!("${}", index))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            spec.table(),
            spec.column_list(),
            placeholders
        ),
        params: values,
    })
}

/// Parameters are `values` followed by the condition's values.
pub fn update(
    spec: &TableColumnSpec,
    values: Vec<Value>,
    condition: &Condition,
) -> Result<Statement, AppError> {
    require_aligned(spec, &values)?;
    require_condition(condition, "update")?;
    let set = assignments(spec.columns().iter().map(|c| c.as_str()), 1, ", ");
    let filter = where_clause(condition, values.len() + 1);
    let mut params = values;
    params.extend(condition_values(condition));
    Ok(Statement {
        sql: format!("UPDATE {} SET {} WHERE {}", spec.table(), set, filter),
        params,
    })
}

pub fn delete(spec: &TableColumnSpec, condition: &Condition) -> Result<Statement, AppError> {
    require_condition(condition, "delete")?;
    Ok(Statement {
        sql: format!(
            "DELETE FROM {} WHERE {}",
            spec.table(),
            where_clause(condition, 1)
        ),
        params: condition_values(condition).collect(),
    })
}

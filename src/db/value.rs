//! Scalar values bound as statement parameters, and dynamic row decoding.

use crate::db::schema::{Column, ColumnKind};
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Column as _, Postgres, Row, TypeInfo};
use uuid::Uuid;

/// A row returned by the engine, keyed by column name.
pub type Record = serde_json::Map<String, JsonValue>;

/// A parameter value. Only these ever reach the database; identifiers go
/// through [`Column`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Uuid(Uuid),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Converts request JSON into the scalar kind stored in `column`.
    pub fn from_json(column: Column, raw: &JsonValue) -> Result<Self, AppError> {
        let text = match raw {
            JsonValue::String(s) => s.as_str(),
            JsonValue::Null => {
                return Err(AppError::ValidationError(format!(
                    "Column '{}' cannot be set to null",
                    column
                )))
            }
            other => {
                return Err(AppError::ValidationError(format!(
                    "Column '{}' expects a string, got {}",
                    column, other
                )))
            }
        };
        Self::parse_for(column, text)
    }

    /// Parses a textual value into the scalar kind stored in `column`.
    pub fn parse_for(column: Column, text: &str) -> Result<Self, AppError> {
        let invalid = |what: &str| {
            AppError::ValidationError(format!("Column '{}' expects {}, got '{}'", column, what, text))
        };
        match column.kind() {
            ColumnKind::Text => Ok(Value::Text(text.to_string())),
            ColumnKind::Uuid => Uuid::parse_str(text.trim())
                .map(Value::Uuid)
                .map_err(|_| invalid("a UUID")),
            ColumnKind::Date => parse_calendar_date(text)
                .map(Value::Date)
                .ok_or_else(|| invalid("a date")),
            ColumnKind::Timestamp => DateTime::parse_from_rfc3339(text.trim())
                .map(|ts| Value::Timestamp(ts.with_timezone(&Utc)))
                .map_err(|_| invalid("an RFC 3339 timestamp")),
        }
    }

    pub(crate) fn bind_to<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            Value::Text(text) => query.bind(text.clone()),
            Value::Uuid(id) => query.bind(*id),
            Value::Date(date) => query.bind(*date),
            Value::Timestamp(ts) => query.bind(*ts),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

/// Accepts `2030-01-01`, `2030/01/01`, RFC 3339 timestamps, local
/// date-times such as `2030-01-01T10:00:00` or `2030-01-01 10:00`, and the
/// US forms `01-31-2030` and `01/31/2030`. Only the date part is kept.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|ts| ts.date())
        .or_else(|| {
            ["%Y-%m-%d", "%Y/%m/%d", "%m-%d-%Y", "%m/%d/%Y"]
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        })
}

/// Decodes a row of any projection into a [`Record`].
///
/// Types outside the schema's set decode as text when possible and as
/// `null` otherwise.
pub fn row_to_record(row: &PgRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();
    for column in row.columns() {
        let index = column.ordinal();
        let value = match column.type_info().name() {
            "UUID" => row.try_get::<Option<Uuid>, _>(index)?.map(|v| JsonValue::String(v.to_string())),
            "DATE" => row.try_get::<Option<NaiveDate>, _>(index)?.map(|v| JsonValue::String(v.to_string())),
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(index)?
                .map(|v| JsonValue::String(v.to_rfc3339())),
            "TIMESTAMP" => row
                .try_get::<Option<NaiveDateTime>, _>(index)?
                .map(|v| JsonValue::String(v.to_string())),
            "INT2" => row.try_get::<Option<i16>, _>(index)?.map(JsonValue::from),
            "INT4" => row.try_get::<Option<i32>, _>(index)?.map(JsonValue::from),
            "INT8" => row.try_get::<Option<i64>, _>(index)?.map(JsonValue::from),
            "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(JsonValue::from),
            _ => row.try_get::<Option<String>, _>(index).ok().flatten().map(JsonValue::String),
        };
        record.insert(column.name().to_string(), value.unwrap_or(JsonValue::Null));
    }
    Ok(record)
}

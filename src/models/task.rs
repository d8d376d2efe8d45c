use crate::db::value::parse_calendar_date;
use crate::db::{BaseQuery, Column, Condition, Record, Table, TableColumnSpec, Value};
use crate::error::AppError;
use crate::security::{calendar_date, not_blank, UUID_REGEX};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TABLE: Table = Table::Tasks;
const LIST_COLUMNS: [Column; 1] = [Column::Id];
const DETAIL_COLUMNS: [Column; 8] = [
    Column::Id,
    Column::UserId,
    Column::Title,
    Column::Description,
    Column::Status,
    Column::DueDate,
    Column::CreatedAt,
    Column::UpdatedAt,
];
const INSERT_COLUMNS: [Column; 4] = [
    Column::UserId,
    Column::Title,
    Column::Description,
    Column::DueDate,
];
const DELETE_COLUMNS: [Column; 5] = [
    Column::Id,
    Column::UserId,
    Column::Title,
    Column::Description,
    Column::Status,
];

/// Input structure for creating a task.
/// Contains validation rules for its fields.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Owner of the task, a hyphenated UUID.
    #[validate(regex(path = "UUID_REGEX", message = "user_id must be a valid UUID"))]
    pub user_id: String,

    #[validate(custom(function = "not_blank", message = "title must be a non-empty string"))]
    pub title: String,

    /// Optional; stored as an empty string when absent.
    pub description: Option<String>,

    /// Any form accepted by `parse_calendar_date`.
    #[validate(custom(function = "calendar_date", message = "due_date must be a valid date"))]
    pub due_date: String,
}

/// A validated task ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    user_id: Uuid,
    title: String,
    description: String,
    due_date: NaiveDate,
}

fn spec(columns: &[Column]) -> Result<TableColumnSpec, AppError> {
    TableColumnSpec::new(TABLE, columns.to_vec())
}

impl Task {
    pub fn new(
        user_id: &str,
        title: &str,
        description: Option<&str>,
        due_date: &str,
    ) -> Result<Self, AppError> {
        Self::from_input(TaskInput {
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            due_date: due_date.to_string(),
        })
    }

    pub fn from_input(input: TaskInput) -> Result<Self, AppError> {
        input.validate()?;
        let user_id = Uuid::parse_str(&input.user_id)
            .map_err(|_| AppError::ValidationError("user_id must be a valid UUID".into()))?;
        let due_date = parse_calendar_date(&input.due_date)
            .ok_or_else(|| AppError::ValidationError("due_date must be a valid date".into()))?;

        Ok(Self {
            user_id,
            title: input.title,
            description: input.description.unwrap_or_default(),
            due_date,
        })
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Every task row. The `id` binding only scopes validation; the engine
    /// reads all columns.
    pub async fn select_all_tasks(pool: &PgPool) -> Result<Vec<Record>, AppError> {
        BaseQuery::new(pool, spec(&LIST_COLUMNS)?).select_all().await
    }

    pub async fn select_all_tasks_columns(
        pool: &PgPool,
        columns: &str,
    ) -> Result<Vec<Record>, AppError> {
        BaseQuery::parse(pool, TABLE.as_str(), columns)?
            .select_columns()
            .await
    }

    pub async fn select_task(pool: &PgPool, condition: &Condition) -> Result<Vec<Record>, AppError> {
        BaseQuery::new(pool, spec(&DETAIL_COLUMNS)?)
            .select_by_value(condition)
            .await
    }

    pub async fn insert_task(&self, pool: &PgPool) -> Result<u64, AppError> {
        BaseQuery::new(pool, spec(&INSERT_COLUMNS)?)
            .insert_values(vec![
                Value::from(self.user_id),
                Value::from(self.title.as_str()),
                Value::from(self.description.as_str()),
                Value::from(self.due_date),
            ])
            .await
    }

    pub async fn update_task(
        pool: &PgPool,
        columns: &str,
        values: Vec<Value>,
        condition: &Condition,
    ) -> Result<u64, AppError> {
        BaseQuery::parse(pool, TABLE.as_str(), columns)?
            .update_values(values, condition)
            .await
    }

    pub async fn delete_task(pool: &PgPool, condition: &Condition) -> Result<u64, AppError> {
        BaseQuery::new(pool, spec(&DELETE_COLUMNS)?)
            .delete_values(condition)
            .await
    }
}

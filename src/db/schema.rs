//! Allow-listed identifiers.
//!
//! Table and column names cannot be bound as parameters, so every identifier
//! that ends up in SQL text goes through the enums in this module. Parsing a
//! name that is not allow-listed fails with `AppError::ValidationError`
//! before any statement is built.

use crate::db::value::Value;
use crate::error::AppError;
use std::fmt;
use std::str::FromStr;

/// Column names accepted anywhere a column is named, in schema order.
pub const ALLOWED_COLUMNS: [&str; 11] = [
    "id",
    "user_id",
    "nome",
    "email",
    "password",
    "created_at",
    "updated_at",
    "title",
    "description",
    "status",
    "due_date",
];

/// Tables the engine may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Tasks,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "users" => Ok(Table::Users),
            "tasks" => Ok(Table::Tasks),
            other => Err(AppError::ValidationError(format!(
                "Invalid table '{}': expected one of users, tasks",
                other
            ))),
        }
    }
}

/// The scalar type stored in a column, used to convert request JSON into a
/// bindable [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Uuid,
    Text,
    Date,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    UserId,
    Nome,
    Email,
    Password,
    CreatedAt,
    UpdatedAt,
    Title,
    Description,
    Status,
    DueDate,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::UserId => "user_id",
            Column::Nome => "nome",
            Column::Email => "email",
            Column::Password => "password",
            Column::CreatedAt => "created_at",
            Column::UpdatedAt => "updated_at",
            Column::Title => "title",
            Column::Description => "description",
            Column::Status => "status",
            Column::DueDate => "due_date",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Id | Column::UserId => ColumnKind::Uuid,
            Column::CreatedAt | Column::UpdatedAt => ColumnKind::Timestamp,
            Column::DueDate => ColumnKind::Date,
            _ => ColumnKind::Text,
        }
    }

    /// Parses a comma-separated column list such as `"id, nome, email"`.
    ///
    /// Whitespace around each item is ignored. An empty list, or an empty
    /// item, is rejected the same way as an unknown name.
    pub fn parse_list(columns: &str) -> Result<Vec<Column>, AppError> {
        columns
            .split(',')
            .map(|item| item.parse::<Column>())
            .collect()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let column = match s.trim() {
            "id" => Column::Id,
            "user_id" => Column::UserId,
            "nome" => Column::Nome,
            "email" => Column::Email,
            "password" => Column::Password,
            "created_at" => Column::CreatedAt,
            "updated_at" => Column::UpdatedAt,
            "title" => Column::Title,
            "description" => Column::Description,
            "status" => Column::Status,
            "due_date" => Column::DueDate,
            other => {
                return Err(AppError::ValidationError(format!(
                    "Invalid column '{}': allowed columns are {}",
                    other,
                    ALLOWED_COLUMNS.join(", ")
                )))
            }
        };
        Ok(column)
    }
}

/// A table bound to an ordered, allow-listed column list.
///
/// Immutable once built; the only ways to build one go through [`Table`]
/// and [`Column`], so an instance is valid by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumnSpec {
    table: Table,
    columns: Vec<Column>,
}

impl TableColumnSpec {
    pub fn new(table: Table, columns: Vec<Column>) -> Result<Self, AppError> {
        if columns.is_empty() {
            return Err(AppError::ValidationError(
                "At least one column is required".into(),
            ));
        }
        Ok(Self { table, columns })
    }

    /// Validates a raw `(table, "col1, col2")` pair against the allow-lists.
    pub fn parse(table: &str, columns: &str) -> Result<Self, AppError> {
        Self::new(table.parse()?, Column::parse_list(columns)?)
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The column list as it appears in SQL text: `id, nome, email`.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(Column::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Equality filter ANDed into a WHERE clause.
///
/// Insertion order is the placeholder order. Adding a column that is already
/// present replaces its value, so each column yields exactly one comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    terms: Vec<(Column, Value)>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for the most common filter: `id = <uuid>`.
    pub fn by_id(id: uuid::Uuid) -> Self {
        Self::new().and(Column::Id, id)
    }

    pub fn and(mut self, column: Column, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.terms.iter_mut().find(|(existing, _)| *existing == column) {
            Some(term) => term.1 = value,
            None => self.terms.push((column, value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Column, Value)> {
        self.terms.iter()
    }
}

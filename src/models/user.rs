use crate::db::{BaseQuery, Column, Condition, Record, Table, TableColumnSpec, Value};
use crate::error::AppError;
use crate::security::{hash_password, not_blank, EMAIL_SHAPE_REGEX};
use serde::Deserialize;
use sqlx::PgPool;
use std::fmt;
use validator::Validate;

const TABLE: Table = Table::Users;
const LIST_COLUMNS: [Column; 1] = [Column::Id];
const DETAIL_COLUMNS: [Column; 5] = [
    Column::Id,
    Column::Nome,
    Column::Email,
    Column::CreatedAt,
    Column::UpdatedAt,
];
const INSERT_COLUMNS: [Column; 3] = [Column::Nome, Column::Email, Column::Password];
const DELETE_COLUMNS: [Column; 3] = [Column::Id, Column::Nome, Column::Email];

/// Raw user fields as received.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserInput {
    #[validate(custom(function = "not_blank", message = "Name must be a non-empty string"))]
    pub nome: String,
    #[validate(regex(
        path = "EMAIL_SHAPE_REGEX",
        message = "Email must be a non-empty string shaped like local@domain"
    ))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Password must be a non-empty string"))]
    pub password: String,
}

/// A validated user ready to be stored. The password is hashed on insert.
#[derive(Clone)]
pub struct User {
    nome: String,
    email: String,
    password: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("User")
            .field("nome", &self.nome)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn spec(columns: &[Column]) -> Result<TableColumnSpec, AppError> {
    TableColumnSpec::new(TABLE, columns.to_vec())
}

impl User {
    pub fn new(nome: &str, email: &str, password: &str) -> Result<Self, AppError> {
        Self::from_input(UserInput {
            nome: nome.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    pub fn from_input(input: UserInput) -> Result<Self, AppError> {
        input.validate()?;
        Ok(Self {
            nome: input.nome,
            email: input.email,
            password: input.password,
        })
    }

    pub fn nome(&self) -> &str {
        &self.nome
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Every user row. The `id` binding only scopes validation; the engine
    /// reads all columns. The password hash is stripped from each row.
    pub async fn select_all_users(pool: &PgPool) -> Result<Vec<Record>, AppError> {
        let rows = BaseQuery::new(pool, spec(&LIST_COLUMNS)?).select_all().await?;
        Ok(without_password(rows))
    }

    /// Every user row projected onto `columns` (e.g. `"nome, email"`).
    /// Asking for `password` yields rows without it.
    pub async fn select_all_users_columns(
        pool: &PgPool,
        columns: &str,
    ) -> Result<Vec<Record>, AppError> {
        let rows = BaseQuery::parse(pool, TABLE.as_str(), columns)?
            .select_columns()
            .await?;
        Ok(without_password(rows))
    }

    /// The first user matching `condition`, without the password column.
    pub async fn select_user(pool: &PgPool, condition: &Condition) -> Result<Vec<Record>, AppError> {
        BaseQuery::new(pool, spec(&DETAIL_COLUMNS)?)
            .select_by_value(condition)
            .await
    }

    pub async fn insert_user(&self, pool: &PgPool) -> Result<u64, AppError> {
        let hashed = hash_password(&self.password)?;
        BaseQuery::new(pool, spec(&INSERT_COLUMNS)?)
            .insert_values(vec![
                Value::from(self.nome.as_str()),
                Value::from(self.email.as_str()),
                Value::from(hashed),
            ])
            .await
    }

    /// Sets `columns` to `values` on rows matching `condition`. A new
    /// password is hashed before it is bound.
    pub async fn update_user(
        pool: &PgPool,
        columns: &str,
        values: Vec<Value>,
        condition: &Condition,
    ) -> Result<u64, AppError> {
        let query = BaseQuery::parse(pool, TABLE.as_str(), columns)?;
        let values = hash_password_values(query.spec().columns(), values)?;
        query.update_values(values, condition).await
    }

    pub async fn delete_user(pool: &PgPool, condition: &Condition) -> Result<u64, AppError> {
        BaseQuery::new(pool, spec(&DELETE_COLUMNS)?)
            .delete_values(condition)
            .await
    }
}

fn without_password(mut rows: Vec<Record>) -> Vec<Record> {
    for row in &mut rows {
        row.remove(Column::Password.as_str());
    }
    rows
}

fn hash_password_values(columns: &[Column], values: Vec<Value>) -> Result<Vec<Value>, AppError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match (columns.get(index), value) {
            (Some(Column::Password), Value::Text(password)) => {
                not_blank(&password).map_err(|_| {
                    AppError::ValidationError("Password must be a non-empty string".into())
                })?;
                Ok(Value::Text(hash_password(&password)?))
            }
            (_, value) => Ok(value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_validation() {
        assert!(User::new("Ana", "ana@mail.com", "Secret123!").is_ok());

        let cases = [
            ("", "ana@mail.com", "Secret123!"),
            ("   ", "ana@mail.com", "Secret123!"),
            ("Ana", "ana-at-mail.com", "Secret123!"),
            ("Ana", "", "Secret123!"),
            ("Ana", "ana@mail.com", ""),
        ];
        for (nome, email, password) in cases {
            assert!(
                matches!(User::new(nome, email, password), Err(AppError::ValidationError(_))),
                "expected rejection for {:?}",
                (nome, email, password)
            );
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let user = User::new("Ana", "ana@mail.com", "Secret123!").unwrap();
        let debug = format!("{:?}", user);
        assert!(debug.contains("ana@mail.com"));
        assert!(!debug.contains("Secret123!"));
    }

    #[test]
    fn test_without_password_strips_hash() {
        let row = serde_json::json!({ "id": "1", "nome": "Ana", "password": "$2b$12$hash" });
        let rows = without_password(vec![row.as_object().unwrap().clone()]);
        assert_eq!(rows[0].len(), 2);
        assert!(rows[0].get("password").is_none());
        assert_eq!(rows[0]["nome"], "Ana");
    }

    #[test]
    fn test_hash_password_values_only_touches_password() {
        let columns = [Column::Nome, Column::Password];
        let values = hash_password_values(
            &columns,
            vec![Value::from("Ana"), Value::from("Secret123!")],
        )
        .unwrap();

        assert_eq!(values[0], Value::from("Ana"));
        match &values[1] {
            Value::Text(hash) => assert!(bcrypt::verify("Secret123!", hash).unwrap()),
            other => panic!("unexpected value {:?}", other),
        }

        assert!(hash_password_values(&columns, vec![Value::from("Ana"), Value::from(" ")]).is_err());
    }
}

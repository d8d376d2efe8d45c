pub mod health;
pub mod tasks;
pub mod users;

use crate::db::{Column, Value};
use crate::error::AppError;
use actix_web::web;
use serde_json::{Map, Value as JsonValue};

/// Registers the user and task resources. Mounted under `/tasks/api` by the app factory.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/user")
            .service(users::select_all_users)
            .service(users::select_all_users_columns)
            .service(users::insert_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(users::select_user),
    )
    .service(
        web::scope("/task")
            .service(tasks::select_all_tasks)
            .service(tasks::select_all_tasks_columns)
            .service(tasks::insert_task)
            .service(tasks::update_task)
            .service(tasks::delete_task)
            .service(tasks::select_task),
    );
}

/// Splits an update body `{"col": value, ...}` into the column list the
/// domain services take and the values in the same order.
pub(crate) fn assignments_from_json(
    body: &Map<String, JsonValue>,
) -> Result<(String, Vec<Value>), AppError> {
    if body.is_empty() {
        return Err(AppError::ValidationError("Nothing to update".into()));
    }
    let mut columns = Vec::with_capacity(body.len());
    let mut values = Vec::with_capacity(body.len());
    for (key, raw) in body {
        let column: Column = key.parse()?;
        values.push(Value::from_json(column, raw)?);
        columns.push(column.as_str());
    }
    Ok((columns.join(", "), values))
}

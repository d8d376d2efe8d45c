use crate::{
    db::Condition,
    error::AppError,
    models::{Task, TaskInput},
    routes::assignments_from_json,
    security::validate_columns_path,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::{json, Map, Value as JsonValue};
use sqlx::PgPool;
use uuid::Uuid;

/// Lists every task.
///
/// ## Responses:
/// - `200 OK`: JSON array of task rows.
/// - `404 Not Found`: the table is empty.
#[get("/all")]
pub async fn select_all_tasks(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let tasks = Task::select_all_tasks(pool.get_ref()).await?;
    if tasks.is_empty() {
        return Err(AppError::NotFound("No tasks found".into()));
    }
    Ok(HttpResponse::Ok().json(tasks))
}

/// Lists every task projected onto a comma-separated column list,
/// e.g. `/all/title, description`.
#[get("/all/{columns}")]
pub async fn select_all_tasks_columns(
    pool: web::Data<PgPool>,
    columns: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let columns = columns.into_inner();
    validate_columns_path(&columns)?;
    let tasks = Task::select_all_tasks_columns(pool.get_ref(), &columns).await?;
    if tasks.is_empty() {
        return Err(AppError::NotFound("No tasks found".into()));
    }
    Ok(HttpResponse::Ok().json(tasks))
}

#[get("/{id}")]
pub async fn select_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let condition = Condition::by_id(task_id.into_inner());
    let task = Task::select_task(pool.get_ref(), &condition)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    Ok(HttpResponse::Ok().json(task))
}

/// Creates a task.
///
/// ## Request Body:
/// `{"user_id": <uuid>, "title": ..., "description": ..., "due_date": ...}`;
/// `description` is optional.
///
/// ## Responses:
/// - `201 Created`: `{"inserted": 1}`.
/// - `422 Unprocessable Entity`: a field breaks a validation rule.
/// - `500 Internal Server Error`: the insert failed (e.g. unknown `user_id`) and was rolled back.
#[post("/insert")]
pub async fn insert_task(
    pool: web::Data<PgPool>,
    payload: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = Task::from_input(payload.into_inner())?;
    let inserted = task.insert_task(pool.get_ref()).await?;
    Ok(HttpResponse::Created().json(json!({ "inserted": inserted })))
}

/// Updates the given columns of one task, e.g. `{"title": "Write report v2"}`.
#[put("/update/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    body: web::Json<Map<String, JsonValue>>,
) -> Result<impl Responder, AppError> {
    let (columns, values) = assignments_from_json(&body)?;
    let condition = Condition::by_id(task_id.into_inner());
    let updated = Task::update_task(pool.get_ref(), &columns, values, &condition).await?;
    if updated == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

#[delete("/delete/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let condition = Condition::by_id(task_id.into_inner());
    let deleted = Task::delete_task(pool.get_ref(), &condition).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}

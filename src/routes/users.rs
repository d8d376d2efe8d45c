use crate::{
    db::Condition,
    error::AppError,
    models::User,
    routes::assignments_from_json,
    security::{strong_password, validate_columns_path, NAME_REGEX},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Registration payload, checked before a `User` is built.
#[derive(Debug, Deserialize, Validate)]
pub struct InsertUserRequest {
    /// 3 to 50 letters and spaces.
    #[validate(
        length(min = 3, max = 50),
        regex(path = "NAME_REGEX", message = "Name may only contain letters and spaces")
    )]
    pub nome: String,
    #[validate(email)]
    pub email: String,
    /// 8 to 100 characters with upper, lower, digit and one of `@$!%*?&`.
    #[validate(
        length(min = 8, max = 100),
        custom(
            function = "strong_password",
            message = "Password needs an uppercase letter, a lowercase letter, a digit and one of @$!%*?&"
        )
    )]
    pub password: String,
}

/// Lists every user.
///
/// ## Responses:
/// - `200 OK`: JSON array of user rows.
/// - `404 Not Found`: the table is empty.
#[get("/all")]
pub async fn select_all_users(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let users = User::select_all_users(pool.get_ref()).await?;
    if users.is_empty() {
        return Err(AppError::NotFound("No users found".into()));
    }
    Ok(HttpResponse::Ok().json(users))
}

/// Lists every user projected onto a comma-separated column list,
/// e.g. `/all/nome, email`.
///
/// ## Responses:
/// - `200 OK`: JSON array of projected rows.
/// - `404 Not Found`: the table is empty.
/// - `422 Unprocessable Entity`: the column list is malformed or not allow-listed.
#[get("/all/{columns}")]
pub async fn select_all_users_columns(
    pool: web::Data<PgPool>,
    columns: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let columns = columns.into_inner();
    validate_columns_path(&columns)?;
    let users = User::select_all_users_columns(pool.get_ref(), &columns).await?;
    if users.is_empty() {
        return Err(AppError::NotFound("No users found".into()));
    }
    Ok(HttpResponse::Ok().json(users))
}

/// Fetches one user by id, without the password column.
#[get("/{id}")]
pub async fn select_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let condition = Condition::by_id(user_id.into_inner());
    let user = User::select_user(pool.get_ref(), &condition)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Registers a user.
///
/// ## Request Body:
/// `{"nome": ..., "email": ..., "password": ...}` matching [`InsertUserRequest`].
///
/// ## Responses:
/// - `201 Created`: `{"inserted": 1}`.
/// - `422 Unprocessable Entity`: the payload breaks a validation rule.
/// - `500 Internal Server Error`: the insert failed (e.g. duplicate email) and was rolled back.
#[post("/insert")]
pub async fn insert_user(
    pool: web::Data<PgPool>,
    payload: web::Json<InsertUserRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let payload = payload.into_inner();
    let user = User::new(&payload.nome, &payload.email, &payload.password)?;
    let inserted = user.insert_user(pool.get_ref()).await?;
    log::info!("Registered user {}", user.email());
    Ok(HttpResponse::Created().json(json!({ "inserted": inserted })))
}

/// Updates the given columns of one user, e.g. `{"nome": "Bia"}`.
#[put("/update/{id}")]
pub async fn update_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    body: web::Json<Map<String, JsonValue>>,
) -> Result<impl Responder, AppError> {
    let (columns, values) = assignments_from_json(&body)?;
    let condition = Condition::by_id(user_id.into_inner());
    let updated = User::update_user(pool.get_ref(), &columns, values, &condition).await?;
    if updated == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

#[delete("/delete/{id}")]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let condition = Condition::by_id(user_id.into_inner());
    let deleted = User::delete_user(pool.get_ref(), &condition).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}

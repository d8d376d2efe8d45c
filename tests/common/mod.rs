#![allow(dead_code)]

use sqlx::PgPool;
use tasks_api::db::{self, Column, Condition, Record};
use tasks_api::models::{Task, User};
use uuid::Uuid;

/// Connects to `DATABASE_URL` and applies migrations.
///
/// The database tests are `#[ignore]`d; run them with
/// `cargo test -- --ignored` against a scratch database.
pub async fn test_pool() -> PgPool {
    dotenv::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations on test DB");
    pool
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, Uuid::new_v4().simple())
}

pub fn unique_title(prefix: &str) -> String {
    format!("{} {}", prefix, Uuid::new_v4().simple())
}

pub fn record_id(record: &Record) -> Uuid {
    record["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("row should carry a UUID id")
}

/// Inserts a user and returns its id.
pub async fn create_user(pool: &PgPool, email: &str) -> Uuid {
    let user = User::new("Ana", email, "Secret123!").expect("valid user");
    assert_eq!(user.insert_user(pool).await.expect("insert user"), 1);
    let rows = User::select_user(pool, &Condition::new().and(Column::Email, email))
        .await
        .expect("select inserted user");
    record_id(&rows[0])
}

/// Inserts a task with a unique title and returns its id.
pub async fn create_task(pool: &PgPool, owner: Uuid, title: &str, description: &str) -> Uuid {
    let task = Task::new(&owner.to_string(), title, Some(description), "2030-01-01")
        .expect("valid task");
    assert_eq!(task.insert_task(pool).await.expect("insert task"), 1);
    let rows = Task::select_task(pool, &Condition::new().and(Column::Title, title))
        .await
        .expect("select inserted task");
    record_id(&rows[0])
}

pub async fn cleanup_user(pool: &PgPool, id: Uuid) {
    let _ = User::delete_user(pool, &Condition::by_id(id)).await;
}

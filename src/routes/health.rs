use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

/// Liveness probe with connection-pool occupancy.
///
/// Never checks out a connection, so it answers even when the pool is exhausted.
#[get("/health")]
pub async fn health(pool: web::Data<PgPool>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "pool": {
            "size": pool.size(),
            "idle": pool.num_idle(),
        }
    }))
}

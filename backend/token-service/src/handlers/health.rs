use actix_web::{web, HttpResponse};
use sqlx::PgPool;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint: verifies the database is reachable
pub async fn readiness_check(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().body("READY"),
        Err(err) => {
            tracing::warn!("Readiness check failed: {}", err);
            HttpResponse::ServiceUnavailable().body("NOT READY")
        }
    }
}

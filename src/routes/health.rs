use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use log::error;
use serde_json::json;

use crate::state::AppState;

/// Health check endpoint
///
/// Reports `ok` when the database answers a trivial query and `unavailable`
/// with `503` otherwise.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "timestamp": Utc::now()
            }))
        }
    }
}

//! Liveness and readiness endpoints.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::ErrorResponse;

/// Liveness payload.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub status: &'static str,
    pub timestamp: String,
}

/// Readiness payload.
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    pub ok: bool,
    pub status: &'static str,
    pub database: &'static str,
}

fn not_ready() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ErrorResponse {
        ok: false,
        error: Some("Database connection failed".to_string()),
        message: None,
    })
}

/// Liveness probe. 200 whenever the process is serving requests.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    )
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness probe. 200 once the database answers a round trip,
/// 503 with the standard error envelope otherwise.
#[utoipa::path(
    get,
    path = "/api/v1/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable", body = ReadyResponse),
        (status = 503, description = "Database unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn ready(pool: web::Data<DbPool>) -> HttpResponse {
    match pool.ping().await {
        Ok(()) => HttpResponse::Ok().json(ReadyResponse {
            ok: true,
            status: "ready",
            database: "connected",
        }),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            not_ready()
        }
    }
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/ready").route(web::get().to(ready)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_not_ready_uses_error_envelope() {
        let resp = not_ready();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Database connection failed");
        assert!(body.get("message").is_none());
    }

    #[actix_web::test]
    async fn test_health_reports_ok() {
        let resp = health().await;
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["status"], "healthy");
    }
}

//! Identity provider webhook handlers.
//!
//! The provider pushes user lifecycle events (created, updated, deleted)
//! that keep the mirrored user table in sync. Deliveries are authenticated
//! by signature, never by session token.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{IdentityEvent, IdentityEventType, OkResponse};
use crate::services::WebhookVerifier;
use crate::services::webhook::{
    WEBHOOK_ID_HEADER, WEBHOOK_SIGNATURE_HEADER, WEBHOOK_TIMESTAMP_HEADER,
};

/// Echo response for webhook connectivity checks.
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookTestResponse {
    pub ok: bool,
    pub message: &'static str,
    /// The request body, echoed back when it is valid JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<serde_json::Value>,
}

fn required_header<'a>(req: &'a HttpRequest, name: &str) -> AppResult<&'a str> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::InvalidInput(format!("Missing {} header", name)))
}

/// Receive a signed identity event.
///
/// The signature covers the raw body, so the payload is read as bytes and
/// parsed only after verification succeeds. Unknown event types are
/// acknowledged without action so new provider events never bounce.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/identity",
    tag = "Webhooks",
    request_body = Vec<u8>,
    responses(
        (status = 200, description = "Event processed", body = OkResponse),
        (status = 400, description = "Missing headers, bad signature, or malformed payload", body = crate::error::ErrorResponse),
    )
)]
pub async fn identity_webhook(
    req: HttpRequest,
    body: web::Bytes,
    pool: web::Data<DbPool>,
    verifier: web::Data<WebhookVerifier>,
) -> AppResult<HttpResponse> {
    let id = required_header(&req, WEBHOOK_ID_HEADER)?;
    let timestamp = required_header(&req, WEBHOOK_TIMESTAMP_HEADER)?;
    let signature = required_header(&req, WEBHOOK_SIGNATURE_HEADER)?;

    verifier.verify(id, timestamp, signature, &body)?;

    let event: IdentityEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidInput(format!("Malformed webhook payload: {}", e)))?;

    match event.kind() {
        IdentityEventType::UserCreated => {
            info!(user_id = %event.data.id, "Webhook: user created");
            pool.create_user_from_event(&event.data).await?;
        }
        IdentityEventType::UserUpdated => {
            info!(user_id = %event.data.id, "Webhook: user updated");
            pool.update_user_from_event(&event.data).await?;
        }
        IdentityEventType::UserDeleted => {
            info!(user_id = %event.data.id, "Webhook: user deleted");
            pool.delete_user_with_content(&event.data.id).await?;
        }
        IdentityEventType::Unknown => {
            warn!(event_type = %event.event_type, "Webhook: ignoring unknown event type");
        }
    }

    Ok(HttpResponse::Ok().json(OkResponse { ok: true }))
}

/// Webhook connectivity check. Unsigned; useful when wiring up the
/// provider's endpoint configuration.
#[utoipa::path(
    get,
    path = "/api/v1/webhooks/test",
    tag = "Webhooks",
    request_body = Vec<u8>,
    responses(
        (status = 200, description = "Endpoint reachable", body = WebhookTestResponse),
    )
)]
pub async fn webhook_test(body: web::Bytes) -> HttpResponse {
    HttpResponse::Ok().json(WebhookTestResponse {
        ok: true,
        message: "Webhook endpoint reachable",
        echo: serde_json::from_slice(&body).ok(),
    })
}

/// Configure webhook routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/webhooks/identity").route(web::post().to(identity_webhook)))
        .service(
            web::resource("/webhooks/test")
                .route(web::get().to(webhook_test))
                .route(web::post().to(webhook_test)),
        );
}

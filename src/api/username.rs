//! Username claim handler.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ClaimUsernameRequest, UserSummary};

/// Response for a username claim. `taken: true` means the name is already
/// held and nothing was written.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClaimUsernameResponse {
    pub ok: bool,
    pub taken: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

/// Claim a username for the caller.
///
/// Availability is a read check followed by a separate write; two
/// concurrent claims of the same name can both pass the check, and the
/// partial unique index on the username column rejects the second write
/// as a database error.
#[utoipa::path(
    post,
    path = "/api/v1/username",
    tag = "Profiles",
    request_body = ClaimUsernameRequest,
    responses(
        (status = 201, description = "Claim result (check `taken`)", body = ClaimUsernameResponse),
        (status = 400, description = "Missing username", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
    ),
    security(("session_token" = []))
)]
pub async fn claim_username(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    body: web::Json<ClaimUsernameRequest>,
) -> AppResult<HttpResponse> {
    let username = body
        .into_inner()
        .username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::InvalidInput("username is required".to_string()))?;

    pool.ensure_user(&auth.claims).await?;

    if let Some(holder) = pool.get_user_by_username(&username).await?
        && holder.id != auth.user_id()
    {
        return Ok(HttpResponse::Created().json(ClaimUsernameResponse {
            ok: true,
            taken: true,
            user: None,
        }));
    }

    let updated = pool.set_username(auth.user_id(), &username).await?;

    info!(user_id = %updated.id, username = %username, "Username claimed");

    Ok(HttpResponse::Created().json(ClaimUsernameResponse {
        ok: true,
        taken: false,
        user: Some(UserSummary::from(updated)),
    }))
}

/// Configure username routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/username").route(web::post().to(claim_username)));
}

//! Actix-web extractor for identity provider bearer tokens.
//!
//! # Security
//! - Token values are wrapped in `SecretString` immediately on extraction
//! - Tokens are never logged or exposed in debug output
//! - Verification failures surface a generic message to the client

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use secrecy::SecretString;

use crate::error::AppError;
use crate::models::SessionClaims;
use crate::services::IdentityVerifier;

/// Extract the bearer token from the Authorization header.
/// Returns None if the header is missing or not a bearer scheme.
fn bearer_token(req: &HttpRequest) -> Option<SecretString> {
    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").or_else(|| s.strip_prefix("bearer ")))
        .map(|t| SecretString::from(t.to_string()))
}

/// Extractor that requires a verified identity provider session token.
///
/// Use this in handlers that require authentication:
/// ```ignore
/// async fn protected_handler(auth: AuthUser) -> impl Responder {
///     // auth.claims.sub is the caller's provider-issued user id
/// }
/// ```
pub struct AuthUser {
    pub claims: SessionClaims,
}

impl AuthUser {
    /// The caller's provider-issued user id.
    pub fn user_id(&self) -> &str {
        &self.claims.sub
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let verifier = req
                .app_data::<web::Data<IdentityVerifier>>()
                .ok_or_else(|| {
                    AppError::Unauthorized("Internal configuration error".to_string())
                })?
                .clone();

            let token = bearer_token(&req).ok_or_else(|| {
                AppError::Unauthorized(
                    "Missing bearer token. Provide an Authorization header.".to_string(),
                )
            })?;

            let claims = verifier
                .verify_token(&token)
                .await
                .map_err(AppError::Unauthorized)?;
            // Note: token is dropped here, memory zeroized

            Ok(AuthUser { claims })
        })
    }
}

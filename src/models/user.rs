//! User models and identity token claims.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::user;

/// Owner summary embedded in post/project responses.
///
/// This is the only user shape public endpoints expose; the email column
/// never leaves the server.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            username: m.username,
        }
    }
}

/// Public profile header for /user/{username} responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileUser {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Claims carried by the identity provider's session tokens.
///
/// `sub` is the provider-issued user id. Profile claims are optional; they
/// seed the mirrored user row when it is created lazily on first
/// authenticated write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Request body for POST /username.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClaimUsernameRequest {
    pub username: Option<String>,
}

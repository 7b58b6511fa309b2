//! Domain models and request/response schemas.

pub mod post;
pub mod project;
pub mod user;
pub mod webhook;

// Re-export commonly used types
pub use post::{CreatePostRequest, PostDetail, ProfilePost, UpdatePostRequest};
pub use project::{
    CreateProjectRequest, ProjectDetail, ProjectItem, UpdateProjectRequest, join_technology,
    parse_technology,
};
pub use user::{ClaimUsernameRequest, ProfileUser, SessionClaims, UserSummary};
pub use webhook::{IdentityEvent, IdentityEventType, IdentityUserData};

/// Identifier-only payload returned by update endpoints.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct IdOnly {
    pub id: String,
}

/// Bare acknowledgement envelope for deletes and webhook receipts.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

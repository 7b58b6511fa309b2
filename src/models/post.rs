//! Post models and request/response schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{post, user};
use crate::models::UserSummary;

/// Full post representation with owner summary.
///
/// Used for the public feed, `?mine=1` listings, and GET by id. Fields are an
/// explicit projection; the raw entity row is never serialized.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostDetail {
    pub id: String,
    pub title: String,
    pub desc: Option<String>,
    pub public: bool,
    pub content: String,
    pub img: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl PostDetail {
    /// Shape a post row (and its owner, when joined) into the API projection.
    pub fn from_row(post: post::Model, owner: Option<user::Model>) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title,
            desc: post.desc,
            public: post.public,
            content: post.content,
            img: post.img,
            created_at: post.created_at,
            updated_at: post.updated_at,
            user: owner.map(UserSummary::from),
        }
    }
}

/// Trimmed post shape for public profile feeds (no content body).
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilePost {
    pub id: String,
    pub title: String,
    pub desc: Option<String>,
    pub img: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<post::Model> for ProfilePost {
    fn from(m: post::Model) -> Self {
        Self {
            id: m.id.to_string(),
            title: m.title,
            desc: m.desc,
            img: m.img,
            created_at: m.created_at,
        }
    }
}

/// Request body for POST /posts.
///
/// `title` and `content` are validated in the handler so a missing field
/// yields the API's 400 envelope rather than a deserializer error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub img: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    pub content: Option<String>,
}

/// Request body for PATCH /posts/{id}. Absent fields are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub img: Option<String>,
    pub public: Option<bool>,
    pub content: Option<String>,
}

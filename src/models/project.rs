//! Project models and the technology-tag boundary.
//!
//! Projects carry a free-text tag list persisted as comma-separated text.
//! `parse_technology`/`join_technology` are the single place that text form
//! is converted; everything above this module sees an ordered `Vec<String>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{project, user};
use crate::models::UserSummary;

/// Parse stored comma-separated technology text into an ordered tag list.
pub fn parse_technology(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Join a tag list back into the stored text form. Empty lists store NULL.
pub fn join_technology(tags: &[String]) -> Option<String> {
    let cleaned: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(","))
    }
}

/// Full project representation with owner summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectDetail {
    pub id: String,
    pub title: String,
    pub detail: String,
    pub technology: Vec<String>,
    pub img: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl ProjectDetail {
    /// Shape a project row (and its owner, when joined) into the API projection.
    pub fn from_row(project: project::Model, owner: Option<user::Model>) -> Self {
        Self {
            id: project.id.to_string(),
            title: project.title,
            detail: project.detail,
            technology: parse_technology(project.technology.as_deref()),
            img: project.img,
            created_at: project.created_at,
            user: owner.map(UserSummary::from),
        }
    }
}

/// Project shape for listings (own projects, featured, public profiles).
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectItem {
    pub id: String,
    pub title: String,
    pub detail: String,
    pub technology: Vec<String>,
    pub img: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<project::Model> for ProjectItem {
    fn from(m: project::Model) -> Self {
        Self {
            id: m.id.to_string(),
            title: m.title,
            detail: m.detail,
            technology: parse_technology(m.technology.as_deref()),
            img: m.img,
            created_at: m.created_at,
        }
    }
}

/// Request body for POST /projects.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub detail: Option<String>,
    #[serde(default)]
    pub technology: Option<Vec<String>>,
    pub img: Option<String>,
}

/// Request body for PATCH /projects/{id}. Absent fields are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub detail: Option<String>,
    pub technology: Option<Vec<String>>,
    pub img: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_technology_splits_and_trims() {
        let tags = parse_technology(Some("Rust, actix-web ,PostgreSQL"));
        assert_eq!(tags, vec!["Rust", "actix-web", "PostgreSQL"]);
    }

    #[test]
    fn test_parse_technology_drops_empty_segments() {
        assert_eq!(parse_technology(Some(",a,,b,")), vec!["a", "b"]);
        assert!(parse_technology(Some("  ")).is_empty());
        assert!(parse_technology(None).is_empty());
    }

    #[test]
    fn test_join_technology_preserves_order() {
        let joined = join_technology(&["React".into(), "Next.js".into()]);
        assert_eq!(joined.as_deref(), Some("React,Next.js"));
    }

    #[test]
    fn test_join_technology_empty_is_null() {
        assert_eq!(join_technology(&[]), None);
        assert_eq!(join_technology(&["  ".into()]), None);
    }

    #[test]
    fn test_technology_round_trip() {
        let tags = vec!["Rust".to_string(), "SeaORM".to_string()];
        let stored = join_technology(&tags).unwrap();
        assert_eq!(parse_technology(Some(&stored)), tags);
    }
}

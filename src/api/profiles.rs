//! Public profile API handlers.
//!
//! Profiles are addressed by claimed username. Only public posts are
//! exposed; projects have no visibility flag and are always listed.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::{ProfilePost, ProfileUser, ProjectItem};

/// Number of posts and projects shown on the combined profile page.
const PROFILE_PREVIEW_LIMIT: u64 = 5;

/// Combined profile response: header plus recent public activity.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub ok: bool,
    pub user: ProfileUser,
    pub posts: Vec<ProfilePost>,
    pub projects: Vec<ProjectItem>,
}

/// Profile posts response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilePostsResponse {
    pub ok: bool,
    pub user: ProfileUser,
    pub posts: Vec<ProfilePost>,
}

/// Profile projects response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileProjectsResponse {
    pub ok: bool,
    pub user: ProfileUser,
    pub projects: Vec<ProjectItem>,
}

fn profile_user(m: &user::Model) -> ProfileUser {
    ProfileUser {
        id: m.id.clone(),
        name: m.name.clone(),
        username: m.username.clone(),
        created_at: Some(m.created_at),
    }
}

async fn resolve_profile(pool: &DbPool, username: &str) -> AppResult<user::Model> {
    pool.get_user_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", username)))
}

/// Get a user's public profile with recent posts and projects.
#[utoipa::path(
    get,
    path = "/api/v1/user/{username}",
    tag = "Profiles",
    params(
        ("username" = String, Path, description = "Claimed username")
    ),
    responses(
        (status = 200, description = "Profile with recent activity", body = ProfileResponse),
        (status = 404, description = "No user with that username", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_profile(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let user = resolve_profile(&pool, &username).await?;

    let posts = pool
        .list_public_posts_for_user(&user.id, Some(PROFILE_PREVIEW_LIMIT))
        .await?;
    let projects = pool
        .list_projects_for_owner(&user.id, Some(PROFILE_PREVIEW_LIMIT))
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        ok: true,
        user: profile_user(&user),
        posts: posts.into_iter().map(ProfilePost::from).collect(),
        projects: projects.into_iter().map(ProjectItem::from).collect(),
    }))
}

/// Get all of a user's public posts.
#[utoipa::path(
    get,
    path = "/api/v1/user/{username}/posts",
    tag = "Profiles",
    params(
        ("username" = String, Path, description = "Claimed username")
    ),
    responses(
        (status = 200, description = "User's public posts", body = ProfilePostsResponse),
        (status = 404, description = "No user with that username", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_profile_posts(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let user = resolve_profile(&pool, &username).await?;

    let posts = pool.list_public_posts_for_user(&user.id, None).await?;

    Ok(HttpResponse::Ok().json(ProfilePostsResponse {
        ok: true,
        user: profile_user(&user),
        posts: posts.into_iter().map(ProfilePost::from).collect(),
    }))
}

/// Get all of a user's projects.
#[utoipa::path(
    get,
    path = "/api/v1/user/{username}/projects",
    tag = "Profiles",
    params(
        ("username" = String, Path, description = "Claimed username")
    ),
    responses(
        (status = 200, description = "User's projects", body = ProfileProjectsResponse),
        (status = 404, description = "No user with that username", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_profile_projects(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let user = resolve_profile(&pool, &username).await?;

    let projects = pool.list_projects_for_owner(&user.id, None).await?;

    Ok(HttpResponse::Ok().json(ProfileProjectsResponse {
        ok: true,
        user: profile_user(&user),
        projects: projects.into_iter().map(ProjectItem::from).collect(),
    }))
}

/// Configure profile routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/user/{username}").route(web::get().to(get_profile)))
        .service(web::resource("/user/{username}/posts").route(web::get().to(get_profile_posts)))
        .service(
            web::resource("/user/{username}/projects").route(web::get().to(get_profile_projects)),
        );
}

//! Project API handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthUser, ensure_owner};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateProjectRequest, IdOnly, OkResponse, ProjectDetail, ProjectItem, UpdateProjectRequest,
};

/// Number of projects shown on the featured feed.
const FEATURED_LIMIT: u64 = 6;

/// Response for project listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectListResponse {
    pub ok: bool,
    pub projects: Vec<ProjectItem>,
}

/// Response wrapping a single project.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub ok: bool,
    pub project: ProjectDetail,
}

/// Response for project updates (identifier only).
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectUpdatedResponse {
    pub ok: bool,
    pub project: IdOnly,
}

/// List the caller's own projects, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Caller's projects", body = ProjectListResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
    ),
    security(("session_token" = []))
)]
pub async fn list_projects(auth: AuthUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let rows = pool.list_projects_for_owner(auth.user_id(), None).await?;

    Ok(HttpResponse::Ok().json(ProjectListResponse {
        ok: true,
        projects: rows.into_iter().map(ProjectItem::from).collect(),
    }))
}

/// Create a project.
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Missing title or detail", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
    ),
    security(("session_token" = []))
)]
pub async fn create_project(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreateProjectRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.title.as_deref().map(str::trim).unwrap_or("").is_empty() {
        return Err(AppError::InvalidInput("title is required".to_string()));
    }
    if req
        .detail
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .is_empty()
    {
        return Err(AppError::InvalidInput("detail is required".to_string()));
    }

    pool.ensure_user(&auth.claims).await?;

    let created = pool.insert_project(auth.user_id(), &req).await?;

    info!(project_id = %created.id, user_id = %auth.user_id(), "Project created");

    Ok(HttpResponse::Created().json(ProjectResponse {
        ok: true,
        project: ProjectDetail::from_row(created, None),
    }))
}

/// Featured project feed.
///
/// Public; returns the newest projects of the configured featured user.
/// An unclaimed featured username yields an empty list, not an error.
#[utoipa::path(
    get,
    path = "/api/v1/projects/featured",
    tag = "Projects",
    responses(
        (status = 200, description = "Featured projects", body = ProjectListResponse),
    )
)]
pub async fn featured_projects(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let projects = match pool.get_user_by_username(&config.featured_username).await? {
        Some(user) => pool
            .list_projects_for_owner(&user.id, Some(FEATURED_LIMIT))
            .await?
            .into_iter()
            .map(ProjectItem::from)
            .collect(),
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(ProjectListResponse { ok: true, projects }))
}

/// Get a single project by id with its owner summary. Public.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(
        ("id" = Uuid, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_project(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let (project, owner) = pool
        .get_project_with_owner(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

    Ok(HttpResponse::Ok().json(ProjectResponse {
        ok: true,
        project: ProjectDetail::from_row(project, owner),
    }))
}

/// Update a project. Owner only; absent fields are left untouched.
#[utoipa::path(
    patch,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(
        ("id" = Uuid, Path, description = "Project id")
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectUpdatedResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("session_token" = []))
)]
pub async fn update_project(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProjectRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let owner_id = pool
        .get_project_owner(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;
    ensure_owner(&owner_id, auth.user_id())?;

    let updated = pool.update_project(id, &body).await?;

    info!(project_id = %updated.id, user_id = %auth.user_id(), "Project updated");

    Ok(HttpResponse::Ok().json(ProjectUpdatedResponse {
        ok: true,
        project: IdOnly {
            id: updated.id.to_string(),
        },
    }))
}

/// Delete a project. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(
        ("id" = Uuid, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Project deleted", body = OkResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("session_token" = []))
)]
pub async fn delete_project(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let owner_id = pool
        .get_project_owner(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;
    ensure_owner(&owner_id, auth.user_id())?;

    pool.delete_project(id).await?;

    info!(project_id = %id, user_id = %auth.user_id(), "Project deleted");

    Ok(HttpResponse::Ok().json(OkResponse { ok: true }))
}

/// Configure project routes.
///
/// `/projects/featured` is registered before `/projects/{id}` so the
/// literal segment wins over the id pattern.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects")
            .route(web::get().to(list_projects))
            .route(web::post().to(create_project)),
    )
    .service(web::resource("/projects/featured").route(web::get().to(featured_projects)))
    .service(
        web::resource("/projects/{id}")
            .route(web::get().to(get_project))
            .route(web::patch().to(update_project))
            .route(web::delete().to(delete_project)),
    );
}

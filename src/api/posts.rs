//! Post API handlers.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthUser, ensure_owner};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{CreatePostRequest, IdOnly, OkResponse, PostDetail, UpdatePostRequest};

/// Query parameters for GET /posts.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListPostsQuery {
    /// When present, return the caller's own posts (public and private)
    /// instead of the public feed. Requires authentication.
    pub mine: Option<String>,
}

/// Response for post listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostListResponse {
    pub ok: bool,
    pub posts: Vec<PostDetail>,
}

/// Response wrapping a single post.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub ok: bool,
    pub post: PostDetail,
}

/// Response for post updates (identifier only).
#[derive(Debug, Serialize, ToSchema)]
pub struct PostUpdatedResponse {
    pub ok: bool,
    pub post: IdOnly,
}

/// List posts.
///
/// Without `?mine`, returns the public feed: public posts from all users,
/// newest first, each with its owner summary. With `?mine=1` the caller
/// must be authenticated and gets all of their own posts, private included.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "Posts",
    params(
        ("mine" = Option<String>, Query, description = "Return the caller's own posts")
    ),
    responses(
        (status = 200, description = "List of posts", body = PostListResponse),
        (status = 401, description = "Missing or invalid token for ?mine", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_posts(
    pool: web::Data<DbPool>,
    query: web::Query<ListPostsQuery>,
    auth: Option<AuthUser>,
) -> AppResult<HttpResponse> {
    let rows = if query.mine.is_some() {
        let auth = auth.ok_or_else(|| {
            AppError::Unauthorized("Authentication required to list your posts".to_string())
        })?;
        pool.list_posts_for_owner(auth.user_id()).await?
    } else {
        pool.list_public_posts().await?
    };

    let posts = rows
        .into_iter()
        .map(|(post, owner)| PostDetail::from_row(post, owner))
        .collect();

    Ok(HttpResponse::Ok().json(PostListResponse { ok: true, posts }))
}

/// Create a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "Posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing title or content", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
    ),
    security(("session_token" = []))
)]
pub async fn create_post(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.title.as_deref().map(str::trim).unwrap_or("").is_empty() {
        return Err(AppError::InvalidInput("title is required".to_string()));
    }
    if req
        .content
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .is_empty()
    {
        return Err(AppError::InvalidInput("content is required".to_string()));
    }

    // First authenticated write mirrors the user row if it does not exist yet
    pool.ensure_user(&auth.claims).await?;

    let created = pool.insert_post(auth.user_id(), &req).await?;

    info!(post_id = %created.id, user_id = %auth.user_id(), "Post created");

    Ok(HttpResponse::Created().json(PostResponse {
        ok: true,
        post: PostDetail::from_row(created, None),
    }))
}

/// Get a single post by id.
///
/// Public posts are visible to everyone. Private posts exist only for their
/// owner; other callers get 404 rather than 403 so private ids are not
/// distinguishable from missing ones.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tag = "Posts",
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post details", body = PostResponse),
        (status = 404, description = "Post not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_post(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    auth: Option<AuthUser>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let (post, owner) = pool
        .get_post_with_owner(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

    if !post.public {
        let is_owner = auth
            .as_ref()
            .map(|a| a.user_id() == post.user_id)
            .unwrap_or(false);
        if !is_owner {
            return Err(AppError::NotFound("Post".to_string()));
        }
    }

    Ok(HttpResponse::Ok().json(PostResponse {
        ok: true,
        post: PostDetail::from_row(post, owner),
    }))
}

/// Update a post. Owner only; absent fields are left untouched.
#[utoipa::path(
    patch,
    path = "/api/v1/posts/{id}",
    tag = "Posts",
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostUpdatedResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Post not found", body = crate::error::ErrorResponse),
    ),
    security(("session_token" = []))
)]
pub async fn update_post(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    // Existence is resolved before ownership: 404 for missing, 403 for others'
    let owner_id = pool
        .get_post_owner(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_string()))?;
    ensure_owner(&owner_id, auth.user_id())?;

    let updated = pool.update_post(id, &body).await?;

    info!(post_id = %updated.id, user_id = %auth.user_id(), "Post updated");

    Ok(HttpResponse::Ok().json(PostUpdatedResponse {
        ok: true,
        post: IdOnly {
            id: updated.id.to_string(),
        },
    }))
}

/// Delete a post. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    tag = "Posts",
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted", body = OkResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Post not found", body = crate::error::ErrorResponse),
    ),
    security(("session_token" = []))
)]
pub async fn delete_post(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let owner_id = pool
        .get_post_owner(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_string()))?;
    ensure_owner(&owner_id, auth.user_id())?;

    pool.delete_post(id).await?;

    info!(post_id = %id, user_id = %auth.user_id(), "Post deleted");

    Ok(HttpResponse::Ok().json(OkResponse { ok: true }))
}

/// Configure post routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts")
            .route(web::get().to(list_posts))
            .route(web::post().to(create_post)),
    )
    .service(
        web::resource("/posts/{id}")
            .route(web::get().to(get_post))
            .route(web::patch().to(update_post))
            .route(web::delete().to(delete_post)),
    );
}

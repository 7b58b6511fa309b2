//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio Server",
        version = "0.3.0",
        description = "Portfolio and blogging API: posts, projects, public profiles, and identity-provider-mirrored users"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Post endpoints
        api::posts::list_posts,
        api::posts::create_post,
        api::posts::get_post,
        api::posts::update_post,
        api::posts::delete_post,
        // Project endpoints
        api::projects::list_projects,
        api::projects::create_project,
        api::projects::featured_projects,
        api::projects::get_project,
        api::projects::update_project,
        api::projects::delete_project,
        // Profile endpoints
        api::profiles::get_profile,
        api::profiles::get_profile_posts,
        api::profiles::get_profile_projects,
        api::username::claim_username,
        // Webhook endpoints
        api::webhooks::identity_webhook,
        api::webhooks::webhook_test,
        // Upload endpoints
        api::uploads::upload_image,
        api::uploads::get_image,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::IdOnly,
            models::OkResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Users
            models::UserSummary,
            models::ProfileUser,
            models::ClaimUsernameRequest,
            api::username::ClaimUsernameResponse,
            // Posts
            models::PostDetail,
            models::ProfilePost,
            models::CreatePostRequest,
            models::UpdatePostRequest,
            api::posts::ListPostsQuery,
            api::posts::PostListResponse,
            api::posts::PostResponse,
            api::posts::PostUpdatedResponse,
            // Projects
            models::ProjectDetail,
            models::ProjectItem,
            models::CreateProjectRequest,
            models::UpdateProjectRequest,
            api::projects::ProjectListResponse,
            api::projects::ProjectResponse,
            api::projects::ProjectUpdatedResponse,
            // Profiles
            api::profiles::ProfileResponse,
            api::profiles::ProfilePostsResponse,
            api::profiles::ProfileProjectsResponse,
            // Webhooks
            api::webhooks::WebhookTestResponse,
            // Uploads
            api::uploads::UploadResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Posts", description = "Blog post CRUD and public feed"),
        (name = "Projects", description = "Project CRUD and featured feed"),
        (name = "Profiles", description = "Public profiles and username claims"),
        (name = "Webhooks", description = "Identity provider event delivery"),
        (name = "Uploads", description = "Image upload and serving")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer token security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

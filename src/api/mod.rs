//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod posts;
pub mod profiles;
pub mod projects;
pub mod uploads;
pub mod username;
pub mod webhooks;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use posts::configure_routes as configure_post_routes;
pub use profiles::configure_routes as configure_profile_routes;
pub use projects::configure_routes as configure_project_routes;
pub use uploads::configure_routes as configure_upload_routes;
pub use username::configure_routes as configure_username_routes;
pub use webhooks::configure_routes as configure_webhook_routes;

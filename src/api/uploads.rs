//! Image upload handlers.
//!
//! Uploaded images are stored in S3 under a server-assigned name so a
//! caller can never overwrite another user's file. The returned URL points
//! back at the serving endpoint here, keeping the bucket private.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::Storage;

/// Response for a stored upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub ok: bool,
    /// Server-assigned filename (`{uuid}.{ext}`).
    pub id: String,
    /// Path the stored image is served from.
    pub url: String,
}

/// Upload an image.
///
/// Accepts the first file field of a multipart form. Only image extensions
/// are accepted and the body is capped at the configured size.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    tag = "Uploads",
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Not an image, too large, or no file field", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
    ),
    security(("session_token" = []))
)]
pub async fn upload_image(
    auth: AuthUser,
    mut payload: Multipart,
    storage: web::Data<Storage>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;

        // Skip non-file form fields
        let Some(filename) = content_disposition.get_filename().map(str::to_string) else {
            continue;
        };

        if !Storage::is_image_filename(&filename) {
            return Err(AppError::InvalidInput(format!(
                "'{}' is not an accepted image type",
                filename
            )));
        }

        // is_image_filename guarantees an extension is present
        let ext = filename
            .rsplit_once('.')
            .map(|(_, e)| e.to_lowercase())
            .unwrap_or_default();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::InvalidInput(format!("Upload read error: {}", e)))?;
            if data.len() + chunk.len() > config.max_image_size {
                return Err(AppError::InvalidInput(format!(
                    "Image exceeds maximum size of {} bytes",
                    config.max_image_size
                )));
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
        }

        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        let key = Storage::image_key(&stored_name);
        let content_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string();

        let size = data.len();
        storage.put(&key, data, Some(&content_type)).await?;

        info!(
            user_id = %auth.user_id(),
            key = %key,
            size = size,
            "Image uploaded"
        );

        return Ok(HttpResponse::Created().json(UploadResponse {
            ok: true,
            id: stored_name.clone(),
            url: format!("/api/v1/uploads/{}", stored_name),
        }));
    }

    Err(AppError::InvalidInput(
        "No file field in multipart body".to_string(),
    ))
}

/// Serve a stored image.
#[utoipa::path(
    get,
    path = "/api/v1/uploads/{filename}",
    tag = "Uploads",
    params(
        ("filename" = String, Path, description = "Server-assigned filename")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*"),
        (status = 404, description = "No such image", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_image(
    storage: web::Data<Storage>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let filename = path.into_inner();

    // Stored names are flat; anything path-like is an attempt to escape the prefix
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(AppError::InvalidInput("Invalid filename".to_string()));
    }

    let key = Storage::image_key(&filename);
    let (data, content_type) = storage
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Image {}", filename)))?;

    let content_type = content_type.unwrap_or_else(|| {
        mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string()
    });

    Ok(HttpResponse::Ok().content_type(content_type).body(data))
}

/// Configure upload routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/uploads").route(web::post().to(upload_image)))
        .service(web::resource("/uploads/{filename}").route(web::get().to(get_image)));
}

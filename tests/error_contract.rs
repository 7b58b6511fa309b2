//! Tests for the JSON error envelope.
//!
//! Every failure response carries `ok: false` plus either an `error` field
//! or, for auth failures, a `message` field. Internal causes must never
//! reach the client.

use actix_web::ResponseError;
use actix_web::body::to_bytes;

use folio_lib::error::AppError;

async fn body_json(err: AppError) -> serde_json::Value {
    let resp = err.error_response();
    let bytes = to_bytes(resp.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[actix_rt::test]
async fn unauthorized_uses_message_field() {
    let body = body_json(AppError::Unauthorized("token expired".into())).await;

    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Not Authorized");
    // The internal reason must not leak
    assert!(body.get("error").is_none());
}

#[actix_rt::test]
async fn invalid_input_surfaces_the_message() {
    let body = body_json(AppError::InvalidInput("title is required".into())).await;

    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "title is required");
    assert!(body.get("message").is_none());
}

#[actix_rt::test]
async fn not_found_is_generic() {
    let body = body_json(AppError::NotFound("Post".into())).await;

    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Not found");
}

#[actix_rt::test]
async fn forbidden_is_generic() {
    let body = body_json(AppError::Forbidden).await;

    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Forbidden");
}

#[actix_rt::test]
async fn internal_errors_never_expose_the_cause() {
    let body = body_json(AppError::Database(
        "connection to 10.0.0.5:5432 refused".into(),
    ))
    .await;

    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Internal Server Error");

    let body = body_json(AppError::Storage("bucket policy denied".into())).await;
    assert_eq!(body["error"], "Internal Server Error");
}

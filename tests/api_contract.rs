//! HTTP-level contract tests for routes that do not need a database.

use actix_web::{App, HttpResponse, test, web};

use folio_lib::api;
use folio_lib::auth::AuthUser;
use folio_lib::config::IdentitySettings;
use folio_lib::services::IdentityVerifier;

fn test_identity_settings() -> IdentitySettings {
    IdentitySettings {
        issuer: "https://id.example.com".to_string(),
        audience: None,
        webhook_secret: "whsec_dGVzdC1zZWNyZXQ".to_string(),
    }
}

async fn protected(_auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[actix_rt::test]
async fn health_returns_healthy() {
    let app =
        test::init_service(App::new().route("/health", web::get().to(api::health::health))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["status"], "healthy");
}

#[actix_rt::test]
async fn webhook_test_endpoint_echoes() {
    let app = test::init_service(
        App::new().route("/webhooks/test", web::get().to(api::webhooks::webhook_test)),
    )
    .await;

    let req = test::TestRequest::get().uri("/webhooks/test").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], true);
}

#[actix_rt::test]
async fn webhook_test_endpoint_echoes_json_body() {
    let app = test::init_service(
        App::new().route(
            "/webhooks/test",
            web::post().to(api::webhooks::webhook_test),
        ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/webhooks/test")
        .set_json(serde_json::json!({"ping": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["echo"]["ping"], 1);
}

#[actix_rt::test]
async fn missing_token_is_401_with_auth_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(IdentityVerifier::new(
                &test_identity_settings(),
            )))
            .route("/protected", web::get().to(protected)),
    )
    .await;

    let req = test::TestRequest::get().uri("/protected").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Not Authorized");
}

#[actix_rt::test]
async fn malformed_token_is_401() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(IdentityVerifier::new(
                &test_identity_settings(),
            )))
            .route("/protected", web::get().to(protected)),
    )
    .await;

    // Not a JWT at all; rejected before any JWKS fetch
    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_rt::test]
async fn non_bearer_scheme_is_401() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(IdentityVerifier::new(
                &test_identity_settings(),
            )))
            .route("/protected", web::get().to(protected)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

//! Database-backed integration tests.
//!
//! These run against a real PostgreSQL instance named by `TEST_DATABASE_URL`
//! (migrations are applied on connect). When the variable is unset the tests
//! skip, so the suite stays green in environments without a database.

use actix_web::body::to_bytes;
use actix_web::{HttpResponse, test, web};
use uuid::Uuid;

use folio_lib::api;
use folio_lib::auth::AuthUser;
use folio_lib::db::DbPool;
use folio_lib::error::AppError;
use folio_lib::migration::{Migrator, MigratorTrait};
use folio_lib::models::{
    ClaimUsernameRequest, CreatePostRequest, CreateProjectRequest, SessionClaims,
    UpdatePostRequest,
};
use folio_lib::services::WebhookVerifier;
use folio_lib::services::webhook::{
    WEBHOOK_ID_HEADER, WEBHOOK_SIGNATURE_HEADER, WEBHOOK_TIMESTAMP_HEADER,
};

const WEBHOOK_SECRET: &str = "whsec_dGVzdC13ZWJob29rLXNpZ25pbmcta2V5";

async fn test_pool() -> Option<DbPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = DbPool::connect(&url).await.ok()?;
    Migrator::up(pool.connection(), None).await.ok()?;
    Some(pool)
}

fn claims_for(sub: &str) -> SessionClaims {
    SessionClaims {
        sub: sub.to_string(),
        iss: "https://id.example.com".to_string(),
        exp: 0,
        iat: 0,
        name: Some("Test User".to_string()),
        email: Some(format!("{}@example.com", sub)),
        username: None,
    }
}

fn fresh_user_id() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}

fn post_request(title: &str, public: bool) -> CreatePostRequest {
    CreatePostRequest {
        title: Some(title.to_string()),
        desc: Some("a description".to_string()),
        img: None,
        public: Some(public),
        content: Some("body text".to_string()),
    }
}

async fn response_json(resp: HttpResponse) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[actix_rt::test]
async fn private_posts_stay_out_of_public_feeds() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let user_id = fresh_user_id();
    let user = pool.ensure_user(&claims_for(&user_id)).await.unwrap();

    let public_post = pool
        .insert_post(&user.id, &post_request("public post", true))
        .await
        .unwrap();
    let private_post = pool
        .insert_post(&user.id, &post_request("private post", false))
        .await
        .unwrap();

    let feed = pool.list_public_posts().await.unwrap();
    assert!(feed.iter().any(|(p, _)| p.id == public_post.id));
    assert!(feed.iter().all(|(p, _)| p.id != private_post.id));

    let profile_feed = pool
        .list_public_posts_for_user(&user.id, None)
        .await
        .unwrap();
    assert_eq!(profile_feed.len(), 1);
    assert_eq!(profile_feed[0].id, public_post.id);

    // The owner's own listing still includes the private post
    let mine = pool.list_posts_for_owner(&user.id).await.unwrap();
    assert_eq!(mine.len(), 2);
}

#[actix_rt::test]
async fn mutating_a_missing_id_is_not_found_before_ownership() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let owner_id = fresh_user_id();
    let intruder_id = fresh_user_id();
    pool.ensure_user(&claims_for(&owner_id)).await.unwrap();
    pool.ensure_user(&claims_for(&intruder_id)).await.unwrap();

    let patch = UpdatePostRequest {
        title: Some("hijacked".to_string()),
        desc: None,
        img: None,
        public: None,
        content: None,
    };

    // Nonexistent id resolves to 404 regardless of who asks
    let err = api::posts::update_post(
        AuthUser {
            claims: claims_for(&intruder_id),
        },
        web::Data::new(pool.clone()),
        web::Path::from(Uuid::new_v4()),
        web::Json(UpdatePostRequest { ..patch }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // An existing record owned by someone else is 403, not 404
    let post = pool
        .insert_post(&owner_id, &post_request("owned", true))
        .await
        .unwrap();

    let err = api::posts::update_post(
        AuthUser {
            claims: claims_for(&intruder_id),
        },
        web::Data::new(pool.clone()),
        web::Path::from(post.id),
        web::Json(UpdatePostRequest {
            title: Some("hijacked".to_string()),
            desc: None,
            img: None,
            public: None,
            content: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // The record is untouched
    let (unchanged, _) = pool.get_post_with_owner(post.id).await.unwrap().unwrap();
    assert_eq!(unchanged.title, "owned");
}

#[actix_rt::test]
async fn taken_username_claim_writes_nothing() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let holder_id = fresh_user_id();
    let claimant_id = fresh_user_id();
    let username = format!("name_{}", Uuid::new_v4().simple());

    pool.ensure_user(&claims_for(&holder_id)).await.unwrap();
    pool.set_username(&holder_id, &username).await.unwrap();
    pool.ensure_user(&claims_for(&claimant_id)).await.unwrap();

    let resp = api::username::claim_username(
        AuthUser {
            claims: claims_for(&claimant_id),
        },
        web::Data::new(pool.clone()),
        web::Json(ClaimUsernameRequest {
            username: Some(username.clone()),
        }),
    )
    .await
    .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let body = response_json(resp).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["taken"], true);

    // No write happened for the claimant, and the holder keeps the name
    let claimant = pool.get_user_by_id(&claimant_id).await.unwrap().unwrap();
    assert!(claimant.username.is_none());
    let holder = pool.get_user_by_username(&username).await.unwrap().unwrap();
    assert_eq!(holder.id, holder_id);
}

#[actix_rt::test]
async fn reclaiming_own_username_is_not_taken() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let user_id = fresh_user_id();
    let username = format!("name_{}", Uuid::new_v4().simple());
    pool.ensure_user(&claims_for(&user_id)).await.unwrap();
    pool.set_username(&user_id, &username).await.unwrap();

    let resp = api::username::claim_username(
        AuthUser {
            claims: claims_for(&user_id),
        },
        web::Data::new(pool.clone()),
        web::Json(ClaimUsernameRequest {
            username: Some(username.clone()),
        }),
    )
    .await
    .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let body = response_json(resp).await;
    assert_eq!(body["taken"], false);

    let user = pool.get_user_by_id(&user_id).await.unwrap().unwrap();
    assert_eq!(user.username.as_deref(), Some(username.as_str()));
}

#[actix_rt::test]
async fn deleted_user_webhook_leaves_no_content() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let user_id = fresh_user_id();
    pool.ensure_user(&claims_for(&user_id)).await.unwrap();
    pool.insert_post(&user_id, &post_request("doomed", true))
        .await
        .unwrap();
    pool.insert_project(
        &user_id,
        &CreateProjectRequest {
            title: Some("doomed project".to_string()),
            detail: Some("detail".to_string()),
            technology: None,
            img: None,
        },
    )
    .await
    .unwrap();

    let verifier = WebhookVerifier::new(WEBHOOK_SECRET).unwrap();
    let payload = serde_json::to_vec(&serde_json::json!({
        "type": "user.deleted",
        "data": { "id": user_id, "deleted": true }
    }))
    .unwrap();
    let ts = chrono::Utc::now().timestamp();
    let signature = verifier.sign("msg_del_1", ts, &payload);

    let req = test::TestRequest::post()
        .insert_header((WEBHOOK_ID_HEADER, "msg_del_1"))
        .insert_header((WEBHOOK_TIMESTAMP_HEADER, ts.to_string()))
        .insert_header((WEBHOOK_SIGNATURE_HEADER, signature))
        .to_http_request();

    let resp = api::webhooks::identity_webhook(
        req,
        web::Bytes::from(payload),
        web::Data::new(pool.clone()),
        web::Data::new(verifier),
    )
    .await
    .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    assert!(pool.get_user_by_id(&user_id).await.unwrap().is_none());
    assert!(pool.list_posts_for_owner(&user_id).await.unwrap().is_empty());
    assert!(
        pool.list_projects_for_owner(&user_id, None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[actix_rt::test]
async fn created_post_reads_back_with_same_fields() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let user_id = fresh_user_id();
    let auth = AuthUser {
        claims: claims_for(&user_id),
    };

    let resp = api::posts::create_post(
        AuthUser {
            claims: claims_for(&user_id),
        },
        web::Data::new(pool.clone()),
        web::Json(CreatePostRequest {
            title: Some("round trip".to_string()),
            desc: Some("kept as written".to_string()),
            img: Some("https://img.example.com/a.png".to_string()),
            public: Some(true),
            content: Some("exact body".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let created = response_json(resp).await;
    let id: Uuid = created["post"]["id"].as_str().unwrap().parse().unwrap();

    let resp = api::posts::get_post(web::Data::new(pool.clone()), web::Path::from(id), Some(auth))
        .await
        .unwrap();
    let body = response_json(resp).await;

    assert_eq!(body["post"]["title"], "round trip");
    assert_eq!(body["post"]["desc"], "kept as written");
    assert_eq!(body["post"]["img"], "https://img.example.com/a.png");
    assert_eq!(body["post"]["public"], true);
    assert_eq!(body["post"]["content"], "exact body");
}

#[actix_rt::test]
async fn project_technology_round_trips_as_ordered_list() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let user_id = fresh_user_id();

    let resp = api::projects::create_project(
        AuthUser {
            claims: claims_for(&user_id),
        },
        web::Data::new(pool.clone()),
        web::Json(CreateProjectRequest {
            title: Some("tagged".to_string()),
            detail: Some("detail".to_string()),
            technology: Some(vec!["Rust".to_string(), "actix-web".to_string()]),
            img: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let created = response_json(resp).await;
    let id: Uuid = created["project"]["id"].as_str().unwrap().parse().unwrap();

    let resp = api::projects::get_project(web::Data::new(pool.clone()), web::Path::from(id))
        .await
        .unwrap();
    let body = response_json(resp).await;

    assert_eq!(
        body["project"]["technology"],
        serde_json::json!(["Rust", "actix-web"])
    );
}

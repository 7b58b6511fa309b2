//! End-to-end contract tests for identity webhook deliveries.
//!
//! Exercises the signing scheme against realistic provider payloads and
//! checks that verified payloads parse into the expected event shapes.

use folio_lib::models::{IdentityEvent, IdentityEventType};
use folio_lib::services::WebhookVerifier;

const SECRET: &str = "whsec_dGVzdC13ZWJob29rLXNpZ25pbmcta2V5";

fn delivery_payload() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "type": "user.created",
        "data": {
            "id": "user_2abc",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email_addresses": [{ "email_address": "ada@example.com" }],
            "username": null
        }
    }))
    .unwrap()
}

#[test]
fn signed_delivery_verifies_and_parses() {
    let verifier = WebhookVerifier::new(SECRET).unwrap();
    let payload = delivery_payload();
    let ts = chrono::Utc::now().timestamp();

    let signature = verifier.sign("msg_01", ts, &payload);
    verifier
        .verify("msg_01", &ts.to_string(), &signature, &payload)
        .unwrap();

    let event: IdentityEvent = serde_json::from_slice(&payload).unwrap();
    assert_eq!(event.kind(), IdentityEventType::UserCreated);
    assert_eq!(event.data.id, "user_2abc");
    assert_eq!(event.data.full_name(), "Ada Lovelace");
    assert_eq!(event.data.primary_email(), "ada@example.com");
}

#[test]
fn signature_over_different_payload_is_rejected() {
    let verifier = WebhookVerifier::new(SECRET).unwrap();
    let payload = delivery_payload();
    let ts = chrono::Utc::now().timestamp();

    let signature = verifier.sign("msg_01", ts, &payload);

    // Same delivery id and timestamp, different body
    let other = br#"{"type":"user.deleted","data":{"id":"user_2abc"}}"#;
    assert!(
        verifier
            .verify("msg_01", &ts.to_string(), &signature, other)
            .is_err()
    );
}

#[test]
fn rotated_secret_signatures_coexist_in_header() {
    // During secret rotation the provider signs with both keys and sends
    // both entries; either verifier must accept the delivery.
    let old = WebhookVerifier::new("whsec_b2xkLXNpZ25pbmcta2V5").unwrap();
    let new = WebhookVerifier::new(SECRET).unwrap();

    let payload = delivery_payload();
    let ts = chrono::Utc::now().timestamp();
    let header = format!(
        "{} {}",
        old.sign("msg_01", ts, &payload),
        new.sign("msg_01", ts, &payload)
    );

    old.verify("msg_01", &ts.to_string(), &header, &payload)
        .unwrap();
    new.verify("msg_01", &ts.to_string(), &header, &payload)
        .unwrap();
}

#[test]
fn deleted_event_parses_without_profile_fields() {
    let payload = br#"{"type":"user.deleted","data":{"id":"user_2abc","deleted":true}}"#;
    let event: IdentityEvent = serde_json::from_slice(payload).unwrap();

    assert_eq!(event.kind(), IdentityEventType::UserDeleted);
    assert_eq!(event.data.id, "user_2abc");
}

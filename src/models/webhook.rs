//! Identity provider webhook event payloads.

use serde::Deserialize;

/// Lifecycle event tags delivered by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityEventType {
    UserCreated,
    UserUpdated,
    UserDeleted,
    Unknown,
}

impl IdentityEventType {
    /// Parse the provider's dotted event tag.
    pub fn parse(s: &str) -> Self {
        match s {
            "user.created" => Self::UserCreated,
            "user.updated" => Self::UserUpdated,
            "user.deleted" => Self::UserDeleted,
            _ => Self::Unknown,
        }
    }
}

/// Email record inside the provider's user payload.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

/// User payload mirrored into the local users table.
///
/// Delete events carry only the id, so every profile field defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUserData {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub username: Option<String>,
}

impl IdentityUserData {
    /// Compose the display name from first/last, trimming missing parts.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    /// First listed email address, empty when absent.
    pub fn primary_email(&self) -> String {
        self.email_addresses
            .first()
            .map(|e| e.email_address.clone())
            .unwrap_or_default()
    }
}

/// Envelope of a webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: IdentityUserData,
}

impl IdentityEvent {
    /// The event tag as a dispatchable enum.
    pub fn kind(&self) -> IdentityEventType {
        IdentityEventType::parse(&self.event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_created_event() {
        let event: IdentityEvent = serde_json::from_str(
            r#"{
                "type": "user.created",
                "data": {
                    "id": "user_abc123",
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "email_addresses": [{"email_address": "ada@example.com", "id": "em_1"}],
                    "username": null
                }
            }"#,
        )
        .unwrap();

        assert_eq!(event.kind(), IdentityEventType::UserCreated);
        assert_eq!(event.data.id, "user_abc123");
        assert_eq!(event.data.full_name(), "Ada Lovelace");
        assert_eq!(event.data.primary_email(), "ada@example.com");
        assert!(event.data.username.is_none());
    }

    #[test]
    fn test_parse_deleted_event_with_sparse_payload() {
        let event: IdentityEvent = serde_json::from_str(
            r#"{"type": "user.deleted", "data": {"id": "user_gone", "deleted": true}}"#,
        )
        .unwrap();

        assert_eq!(event.kind(), IdentityEventType::UserDeleted);
        assert_eq!(event.data.id, "user_gone");
        assert_eq!(event.data.full_name(), "");
        assert_eq!(event.data.primary_email(), "");
    }

    #[test]
    fn test_unknown_event_type() {
        let event: IdentityEvent =
            serde_json::from_str(r#"{"type": "session.created", "data": {"id": "user_x"}}"#)
                .unwrap();

        assert_eq!(event.kind(), IdentityEventType::Unknown);
    }

    #[test]
    fn test_full_name_with_missing_last_name() {
        let data: IdentityUserData =
            serde_json::from_str(r#"{"id": "u1", "first_name": "Prince"}"#).unwrap();
        assert_eq!(data.full_name(), "Prince");
    }
}

//! Webhook signature verification for identity provider deliveries.
//!
//! Deliveries are signed with HMAC-SHA256 over `{id}.{timestamp}.{payload}`.
//! The signing secret is delivered as `whsec_` followed by the base64 key.
//! Signatures arrive space-delimited as `v1,<base64>` entries so the provider
//! can roll secrets; verification accepts any matching entry. Comparison is
//! constant-time.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the unique delivery id.
pub const WEBHOOK_ID_HEADER: &str = "webhook-id";

/// Header carrying the delivery timestamp (unix seconds).
pub const WEBHOOK_TIMESTAMP_HEADER: &str = "webhook-timestamp";

/// Header carrying the signature list.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "webhook-signature";

/// Maximum allowed clock skew between the delivery timestamp and now.
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Verifier for signed webhook deliveries.
#[derive(Clone)]
pub struct WebhookVerifier {
    key: Vec<u8>,
}

impl WebhookVerifier {
    /// Create a verifier from the provider's signing secret.
    pub fn new(secret: &str) -> AppResult<Self> {
        let encoded = secret.strip_prefix("whsec_").unwrap_or(secret);
        let key = BASE64.decode(encoded).map_err(|e| {
            AppError::InvalidInput(format!("Webhook secret is not valid base64: {}", e))
        })?;

        Ok(Self { key })
    }

    /// Compute the `v1,<base64>` signature for a delivery.
    pub fn sign(&self, id: &str, timestamp: i64, payload: &[u8]) -> String {
        format!("v1,{}", BASE64.encode(self.mac(id, timestamp, payload)))
    }

    /// Verify a delivery against its signature headers.
    ///
    /// Any failure (bad timestamp, skew beyond tolerance, malformed or
    /// mismatched signature) is `InvalidInput`, surfaced to the provider
    /// as a 400.
    pub fn verify(
        &self,
        id: &str,
        timestamp: &str,
        signature_header: &str,
        payload: &[u8],
    ) -> AppResult<()> {
        let timestamp: i64 = timestamp
            .parse()
            .map_err(|_| AppError::InvalidInput("Invalid webhook timestamp".to_string()))?;

        let skew = (chrono::Utc::now().timestamp() - timestamp).abs();
        if skew > TIMESTAMP_TOLERANCE_SECS {
            return Err(AppError::InvalidInput(
                "Webhook timestamp outside tolerance".to_string(),
            ));
        }

        let expected = self.mac(id, timestamp, payload);

        for entry in signature_header.split(' ') {
            let Some(encoded) = entry.strip_prefix("v1,") else {
                continue;
            };
            let Ok(provided) = BASE64.decode(encoded) else {
                continue;
            };
            if provided.ct_eq(&expected).into() {
                return Ok(());
            }
        }

        Err(AppError::InvalidInput(
            "Webhook signature mismatch".to_string(),
        ))
    }

    fn mac(&self, id: &str, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

//! Identity provider session-token verification.
//!
//! Verifies bearer JWTs issued by the external identity provider using its
//! published JWKS.
//!
//! Security features:
//! - RS256 signature verification (algorithm pinned, no fallback)
//! - JWKS cached with TTL + automatic retry on key rotation (kid miss)
//! - HTTP timeouts on JWKS fetch to prevent hanging
//! - JWKS URL derived from the configured issuer
//! - Generic error messages to clients; details logged server-side
//! - Audience validation warned if not configured

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::IdentitySettings;
use crate::models::SessionClaims;

/// JWKS cache TTL (24 hours).
const JWKS_CACHE_TTL: Duration = Duration::from_secs(86400);

/// HTTP connect timeout for JWKS fetch.
const JWKS_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP total timeout for JWKS fetch.
const JWKS_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Cached JWKS keys.
struct CachedKeys {
    keys: Vec<(String, DecodingKey)>,
    fetched_at: Instant,
}

/// Session token verifier against the identity provider's JWKS.
#[derive(Clone)]
pub struct IdentityVerifier {
    issuer: String,
    jwks_url: String,
    audience: Option<String>,
    jwks_cache: Arc<RwLock<Option<CachedKeys>>>,
    http_client: reqwest::Client,
}

/// JWKS response from the identity provider.
#[derive(serde::Deserialize)]
struct JwksResponse {
    keys: Vec<serde_json::Value>,
}

impl IdentityVerifier {
    /// Create a new verifier from settings.
    pub fn new(settings: &IdentitySettings) -> Self {
        // Derive JWKS URL from issuer
        let jwks_url = format!(
            "{}/.well-known/jwks.json",
            settings.issuer.trim_end_matches('/')
        );

        if settings.audience.is_none() {
            warn!(
                "FOLIO_IDENTITY_AUDIENCE is not set. \
                 Without audience validation, tokens minted for other services \
                 could be replayed against this server."
            );
        }

        let http_client = reqwest::Client::builder()
            .connect_timeout(JWKS_CONNECT_TIMEOUT)
            .timeout(JWKS_REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client for identity verification");

        info!(
            "Identity verifier initialized (issuer={}, jwks_url={}, audience={:?})",
            settings.issuer, jwks_url, settings.audience
        );

        Self {
            issuer: settings.issuer.clone(),
            jwks_url,
            audience: settings.audience.clone(),
            jwks_cache: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Verify a session token and return its claims.
    ///
    /// On failure, returns a generic error string safe for the client.
    /// Detailed errors are logged server-side.
    pub async fn verify_token(&self, token: &SecretString) -> Result<SessionClaims, String> {
        // Decode header to get key ID (the header is not secret)
        let header = decode_header(token.expose_secret()).map_err(|e| {
            warn!("identity: invalid JWT header: {}", e);
            "Invalid token".to_string()
        })?;
        let kid = header.kid.ok_or_else(|| {
            warn!("identity: JWT missing 'kid' header");
            "Invalid token".to_string()
        })?;

        // Find the decoding key, retrying JWKS fetch on kid miss
        let decoding_key = self.find_key_with_retry(&kid).await.map_err(|e| {
            warn!("identity: key lookup failed for kid '{}': {}", kid, e);
            "Authentication failed".to_string()
        })?;

        // Build validation
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        if let Some(ref aud) = self.audience {
            validation.set_audience(&[aud]);
        } else {
            validation.validate_aud = false;
        }

        // Verify and decode
        let token_data = decode::<SessionClaims>(token.expose_secret(), &decoding_key, &validation)
            .map_err(|e| {
                warn!("identity: JWT verification failed: {}", e);
                "Authentication failed".to_string()
            })?;

        debug!(user_id = %token_data.claims.sub, "Session token verified");

        Ok(token_data.claims)
    }

    /// Find a decoding key by kid. On miss, force a JWKS refresh and retry once.
    async fn find_key_with_retry(&self, kid: &str) -> Result<DecodingKey, String> {
        // First attempt: use cached keys
        let keys = self.get_or_fetch_keys(false).await?;
        if let Some((_, key)) = keys.iter().find(|(k, _)| k == kid) {
            return Ok(key.clone());
        }

        // Kid not found, force refresh (key rotation may have occurred)
        info!(
            "identity: kid '{}' not in cache, forcing JWKS refresh for key rotation",
            kid
        );
        let keys = self.get_or_fetch_keys(true).await?;
        keys.iter()
            .find(|(k, _)| k == kid)
            .map(|(_, key)| key.clone())
            .ok_or_else(|| format!("Unknown key ID '{}' after JWKS refresh", kid))
    }

    /// Get cached JWKS keys or fetch from provider. If `force_refresh` is true, skip cache.
    async fn get_or_fetch_keys(
        &self,
        force_refresh: bool,
    ) -> Result<Vec<(String, DecodingKey)>, String> {
        if !force_refresh {
            let cache = self.jwks_cache.read().await;
            if let Some(ref cached) = *cache
                && cached.fetched_at.elapsed() < JWKS_CACHE_TTL
            {
                return Ok(cached.keys.clone());
            }
        }

        match self.fetch_jwks().await {
            Ok(keys) => {
                let mut cache = self.jwks_cache.write().await;
                *cache = Some(CachedKeys {
                    keys: keys.clone(),
                    fetched_at: Instant::now(),
                });
                Ok(keys)
            }
            Err(e) => {
                // If we have stale cached keys and this isn't a forced refresh, use them
                if !force_refresh {
                    let cache = self.jwks_cache.read().await;
                    if let Some(ref cached) = *cache {
                        warn!("Failed to refresh JWKS, using stale cache: {}", e);
                        return Ok(cached.keys.clone());
                    }
                }
                Err(e)
            }
        }
    }

    /// Fetch JWKS from the identity provider (derived from issuer URL).
    async fn fetch_jwks(&self) -> Result<Vec<(String, DecodingKey)>, String> {
        info!("Fetching identity provider JWKS from {}", self.jwks_url);

        let response: JwksResponse = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {}", e))?
            .json()
            .await
            .map_err(|e| format!("Failed to parse JWKS response: {}", e))?;

        let mut keys = Vec::new();
        for jwk_value in &response.keys {
            let jwk: jsonwebtoken::jwk::Jwk = match serde_json::from_value(jwk_value.clone()) {
                Ok(j) => j,
                Err(e) => {
                    warn!("Failed to parse JWK: {}", e);
                    continue;
                }
            };

            if let Some(ref kid) = jwk.common.key_id {
                match DecodingKey::from_jwk(&jwk) {
                    Ok(key) => keys.push((kid.clone(), key)),
                    Err(e) => warn!("Failed to create decoding key from JWK {}: {}", kid, e),
                }
            }
        }

        info!("Loaded {} JWKS keys from identity provider", keys.len());
        Ok(keys)
    }
}

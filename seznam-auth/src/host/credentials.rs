//! One-time storage of completed logins until the popup's opener collects them.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use super::CredentialRetriever;
use crate::error::{credential_error, secret_error, CredentialErrorKind, Error, SecretErrorKind};
use crate::oauth::LoginResult;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
struct PendingCredential {
    /// HMAC of the credential secret under the store's key; the secret itself is not kept.
    secret_tag: Vec<u8>,
    result: LoginResult,
    expires_at: DateTime<Utc>,
}

/// Completed login results keyed by credential token, each paired with a
/// random credential secret and an expiry.
///
/// A credential can be retrieved exactly once.
#[derive(Debug)]
pub struct PendingCredentials {
    pending: DashMap<String, PendingCredential>,
    ttl: Duration,
    tag_key: [u8; 32],
}

impl PendingCredentials {
    /// Create a store with the default TTL of 10 minutes.
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(10))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            pending: DashMap::new(),
            ttl,
            tag_key: rand::thread_rng().gen(),
        }
    }

    /// Store a login result under `credential_token`, replacing any earlier entry.
    ///
    /// Returns the credential secret the caller must present on retrieval.
    pub fn store(&self, credential_token: &str, result: LoginResult) -> Result<String, Error> {
        let secret = Self::generate_secret();
        let secret_tag = self.secret_mac(&secret)?.finalize().into_bytes().to_vec();
        self.pending.insert(
            credential_token.to_string(),
            PendingCredential {
                secret_tag,
                result,
                expires_at: Utc::now() + self.ttl,
            },
        );
        Ok(secret)
    }

    /// Drop credentials nobody collected in time.
    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        self.pending.retain(|_, credential| credential.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn secret_mac(&self, secret: &str) -> Result<HmacSha256, Error> {
        let mut mac = HmacSha256::new_from_slice(&self.tag_key)
            .map_err(|_| secret_error(SecretErrorKind::SealFailed, "invalid HMAC key"))?;
        mac.update(secret.as_bytes());
        Ok(mac)
    }

    fn generate_secret() -> String {
        let random_bytes: [u8; 32] = rand::thread_rng().gen();
        hex::encode(random_bytes)
    }
}

impl Default for PendingCredentials {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialRetriever for PendingCredentials {
    async fn retrieve_credential(
        &self,
        credential_token: &str,
        credential_secret: &str,
    ) -> Result<LoginResult, Error> {
        let presented = self.secret_mac(credential_secret)?;
        // verify_slice compares in constant time
        let removed = self
            .pending
            .remove_if(credential_token, |_, credential| {
                presented.clone().verify_slice(&credential.secret_tag).is_ok()
            });

        let Some((_, credential)) = removed else {
            return Err(if self.pending.contains_key(credential_token) {
                credential_error(
                    CredentialErrorKind::SecretMismatch,
                    "credential secret does not match",
                )
            } else {
                credential_error(CredentialErrorKind::NotFound, "no pending credential")
            });
        };

        if Utc::now() > credential.expires_at {
            return Err(credential_error(
                CredentialErrorKind::Expired,
                "pending credential expired",
            ));
        }

        Ok(credential.result)
    }
}

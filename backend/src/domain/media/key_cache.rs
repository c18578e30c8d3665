//! Single-flight signing key cache.
//!
//! The private signing key is fetched from the secret store at most once per
//! process lifetime. `tokio::sync::OnceCell::get_or_try_init` provides the
//! single-flight gate: concurrent cold-start callers converge on one
//! underlying fetch, and a failed fetch leaves the cell empty so the next
//! call retries from scratch.

use std::sync::Arc;

use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{SecretStore, SecretStoreError};

/// Short non-reversible digest of the key material, safe to log.
fn key_fingerprint(pem: &str) -> String {
    let digest = Sha256::digest(pem.as_bytes());
    hex::encode(&digest[..8])
}

fn map_store_error(error: SecretStoreError) -> Error {
    Error::service_unavailable(format!("signing key unavailable: {error}"))
}

/// Lazily fetched, process-lifetime cache of the media signing key.
pub struct SigningKeyCache {
    secrets: Arc<dyn SecretStore>,
    secret_name: String,
    key: OnceCell<Arc<RsaPrivateKey>>,
}

impl SigningKeyCache {
    /// Create an empty cache backed by the given secret store.
    pub fn new(secrets: Arc<dyn SecretStore>, secret_name: impl Into<String>) -> Self {
        Self {
            secrets,
            secret_name: secret_name.into(),
            key: OnceCell::new(),
        }
    }

    /// Return the signing key, fetching and parsing it on first use.
    ///
    /// # Errors
    /// `ServiceUnavailable` when the secret store is unreachable, holds no
    /// secret under the configured name, or the stored PEM does not parse.
    /// Failures are not cached.
    pub async fn get_key(&self) -> Result<Arc<RsaPrivateKey>, Error> {
        self.key
            .get_or_try_init(|| self.fetch_key())
            .await
            .cloned()
    }

    async fn fetch_key(&self) -> Result<Arc<RsaPrivateKey>, Error> {
        let pem = self
            .secrets
            .get_secret(&self.secret_name)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| {
                Error::service_unavailable(format!(
                    "signing key unavailable: no secret named {}",
                    self.secret_name
                ))
            })?;
        let key = RsaPrivateKey::from_pkcs8_pem(&pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
            .map_err(|_| {
                Error::service_unavailable(format!(
                    "signing key unavailable: secret {} is not a valid RSA private key",
                    self.secret_name
                ))
            })?;
        info!(
            secret_name = %self.secret_name,
            fingerprint = %key_fingerprint(&pem),
            "media signing key loaded"
        );
        Ok(Arc::new(key))
    }
}

#[cfg(test)]
#[path = "key_cache_tests.rs"]
mod tests;

//! Reqwest-backed secret manager adapter.
//!
//! This adapter owns transport details only: URL construction, the bounded
//! request timeout, and HTTP status mapping. A timeout surfaces as the same
//! error as an unreachable store; callers cannot distinguish "slow" from
//! "down". Secret values never appear in logs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use zeroize::Zeroizing;

use crate::domain::ports::{SecretStore, SecretStoreError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

fn map_transport_error(error: &reqwest::Error) -> SecretStoreError {
    if error.is_timeout() {
        SecretStoreError::connection(format!("request timed out: {error}"))
    } else {
        SecretStoreError::connection(error.to_string())
    }
}

/// Secret manager client fetching secrets over HTTPS.
///
/// Secrets are exposed at `GET {base_url}/v1/secrets/{name}` with the value
/// as the plain response body; a 404 means the store is healthy but holds no
/// such secret.
pub struct HttpSecretStore {
    client: Client,
    base_url: Url,
}

impl HttpSecretStore {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn secret_url(&self, name: &str) -> Result<Url, SecretStoreError> {
        self.base_url
            .join(&format!("v1/secrets/{name}"))
            .map_err(|error| SecretStoreError::response(format!("invalid secret name: {error}")))
    }
}

#[async_trait]
impl SecretStore for HttpSecretStore {
    async fn get_secret(
        &self,
        name: &str,
    ) -> Result<Option<Zeroizing<String>>, SecretStoreError> {
        let url = self.secret_url(name)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| map_transport_error(&error))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SecretStoreError::response(format!(
                "status {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|error| map_transport_error(&error))?;
        Ok(Some(Zeroizing::new(body)))
    }
}

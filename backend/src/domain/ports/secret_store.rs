//! Port abstraction for secret material retrieval.
//!
//! The [`SecretStore`] trait is the single seam between the signing-key
//! cache and whatever holds the private key at rest (an HTTP secret manager
//! in production, a directory of files in development). A timeout and a hard
//! failure surface identically; callers cannot distinguish "slow" from
//! "down".

use async_trait::async_trait;
use zeroize::Zeroizing;

/// Errors raised by secret store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecretStoreError {
    /// The store could not be reached (transport failure or timeout).
    #[error("secret store unreachable: {message}")]
    Connection {
        /// Adapter-supplied detail.
        message: String,
    },
    /// The store answered but the response was unusable.
    #[error("secret store request failed: {message}")]
    Response {
        /// Adapter-supplied detail.
        message: String,
    },
}

impl SecretStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a response error with the given message.
    pub fn response(message: impl Into<String>) -> Self {
        Self::Response {
            message: message.into(),
        }
    }
}

/// Port for fetching named secrets.
///
/// Returned values are wrapped in [`Zeroizing`] so intermediate buffers are
/// scrubbed when dropped; implementations must never log secret content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret by name.
    ///
    /// Returns `Ok(None)` when the store is healthy but holds no secret
    /// under `name`; that case is distinct from a transport failure.
    async fn get_secret(&self, name: &str)
    -> Result<Option<Zeroizing<String>>, SecretStoreError>;
}

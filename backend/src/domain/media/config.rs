//! Validated media signing configuration.
//!
//! Construction is the validation point: a service holding a
//! [`MediaSigningConfig`] can sign without re-checking the domain or key
//! identifiers on every request. Missing or malformed values fail at
//! startup, not at call time.

use url::Url;

/// Errors raised while validating media signing settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaConfigError {
    /// The media domain is not an absolute `https` URL.
    #[error("media domain must be an absolute https URL, got {value}")]
    InvalidDomain {
        /// The rejected value.
        value: String,
    },
    /// The key pair identifier is empty.
    #[error("media key pair id must not be empty")]
    EmptyKeyPairId,
    /// The signing secret name is empty.
    #[error("media signing secret name must not be empty")]
    EmptySecretName,
}

/// Settings the credential signer needs, validated at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSigningConfig {
    media_domain: Url,
    key_pair_id: String,
    secret_name: String,
}

impl MediaSigningConfig {
    /// Validate and build a signing configuration.
    ///
    /// # Errors
    /// Returns [`MediaConfigError`] when the domain is not an absolute
    /// `https` URL or either identifier is empty.
    ///
    /// # Examples
    /// ```
    /// use studyhall_backend::domain::media::MediaSigningConfig;
    ///
    /// let config = MediaSigningConfig::new(
    ///     "https://media.studyhall.example",
    ///     "K2JCJMDEHXQW5F",
    ///     "media-signing-key",
    /// )
    /// .expect("valid settings");
    /// assert_eq!(config.key_pair_id(), "K2JCJMDEHXQW5F");
    /// ```
    pub fn new(
        media_domain: &str,
        key_pair_id: impl Into<String>,
        secret_name: impl Into<String>,
    ) -> Result<Self, MediaConfigError> {
        let parsed = Url::parse(media_domain).map_err(|_| MediaConfigError::InvalidDomain {
            value: media_domain.to_owned(),
        })?;
        if parsed.scheme() != "https" || parsed.host_str().is_none() {
            return Err(MediaConfigError::InvalidDomain {
                value: media_domain.to_owned(),
            });
        }
        let key_pair_id = key_pair_id.into();
        if key_pair_id.is_empty() {
            return Err(MediaConfigError::EmptyKeyPairId);
        }
        let secret_name = secret_name.into();
        if secret_name.is_empty() {
            return Err(MediaConfigError::EmptySecretName);
        }
        Ok(Self {
            media_domain: parsed,
            key_pair_id,
            secret_name,
        })
    }

    /// Identifier of the verifying key pair at the content-delivery edge.
    pub fn key_pair_id(&self) -> &str {
        &self.key_pair_id
    }

    /// Name under which the secret store holds the private signing key.
    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }

    /// Absolute URL of a media object under the configured domain.
    pub fn resource_url(&self, resource_key: &str) -> String {
        let base = self.media_domain.as_str().trim_end_matches('/');
        let key = resource_key.trim_start_matches('/');
        format!("{base}/{key}")
    }
}

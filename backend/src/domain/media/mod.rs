//! Media credential issuance.
//!
//! Split into a validated configuration ([`MediaSigningConfig`]), a
//! single-flight signing-key cache ([`SigningKeyCache`]), the credential
//! signer ([`CredentialIssuer`]), and the [`MediaService`] that composes
//! them behind the enrollment gate.

pub mod config;
pub mod key_cache;
pub mod service;
pub mod signer;

pub use self::config::{MediaConfigError, MediaSigningConfig};
pub use self::key_cache::SigningKeyCache;
pub use self::service::MediaService;
pub use self::signer::CredentialIssuer;

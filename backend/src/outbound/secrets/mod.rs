//! Secret store adapters.
//!
//! Two implementations of the [`crate::domain::ports::SecretStore`] port: an
//! HTTP secret-manager client for production and a directory-of-files store
//! for development and container secret mounts.

pub mod file_store;
pub mod http_store;

pub use self::file_store::FileSecretStore;
pub use self::http_store::HttpSecretStore;

//! Directory-backed secret store adapter.
//!
//! Reads secrets from `<dir>/<name>` the way container runtimes mount them
//! under `/run/secrets`. A missing file means the store holds no such
//! secret; any other I/O failure is a store error.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{SecretStore, SecretStoreError};

/// Secret store reading one file per secret from a directory.
pub struct FileSecretStore {
    dir: PathBuf,
}

impl FileSecretStore {
    /// Create a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret(
        &self,
        name: &str,
    ) -> Result<Option<Zeroizing<String>>, SecretStoreError> {
        // Reject path traversal in secret names before touching the disk.
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(SecretStoreError::response(format!(
                "invalid secret name: {name}"
            )));
        }
        let path = self.dir.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(Zeroizing::new(content))),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(SecretStoreError::connection(format!(
                "failed to read {}: {error}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_an_existing_secret() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("media-signing-key"), "pem-content")
            .expect("write secret");

        let store = FileSecretStore::new(dir.path());
        let secret = store
            .get_secret("media-signing-key")
            .await
            .expect("store healthy")
            .expect("secret present");
        assert_eq!(secret.as_str(), "pem-content");
    }

    #[tokio::test]
    async fn missing_secret_is_none_not_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileSecretStore::new(dir.path());
        let secret = store.get_secret("absent").await.expect("store healthy");
        assert!(secret.is_none());
    }

    #[tokio::test]
    async fn rejects_path_traversal_names() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileSecretStore::new(dir.path());
        let error = store
            .get_secret("../etc/passwd")
            .await
            .expect_err("traversal rejected");
        assert!(matches!(error, SecretStoreError::Response { .. }));
    }
}
